use crate::collector::collect_cli_specifiers;
use crate::config::PreloadConfig;
use crate::errors::Result;
use crate::executor::{ModuleEvaluator, PreloadExecutor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::module_resolver::ModuleResolver;
use crate::plan::PreloadPlan;
use crate::rc::RcLoader;
use crate::specifier::{RawSpecifier, ResolvedModule};
use crate::trust::TrustFilter;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Preload pipeline container
/// Owns the shared configuration and file system and wires every stage
pub struct Preloader {
    config: Arc<PreloadConfig>,
    file_system: Arc<dyn FileSystem>,
    resolver: ModuleResolver,
}

impl Preloader {
    /// Create a preloader backed by the real file system
    pub fn new(config: PreloadConfig) -> Self {
        Self::with_file_system(config, Arc::new(RealFileSystem::new()))
    }

    /// Create a preloader with a custom file system (for testing)
    pub fn with_file_system(config: PreloadConfig, file_system: Arc<dyn FileSystem>) -> Self {
        let config = Arc::new(config);
        let resolver = ModuleResolver::new(file_system.clone(), config.global_root.clone());

        Preloader {
            config,
            file_system,
            resolver,
        }
    }

    pub fn config(&self) -> &Arc<PreloadConfig> {
        &self.config
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.file_system
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Compute the plan for a full command line (program name excluded)
    pub fn plan<I, S>(&self, tokens: I) -> Result<PreloadPlan>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cli = collect_cli_specifiers(tokens)?;
        self.plan_specifiers(cli)
    }

    /// Compute the plan for already collected command-line specifiers
    ///
    /// Fatal conditions surface in this order: rc read failure, command-line
    /// resolution failures, rc resolution failures.
    pub fn plan_specifiers(&self, cli: Vec<RawSpecifier>) -> Result<PreloadPlan> {
        let rc = RcLoader::new(
            self.config.rc_enable,
            self.config.rc_path.clone(),
            self.file_system.clone(),
        )
        .load()?;

        let cli = self.resolve_all(&cli, &self.config.working_dir)?;
        let rc = self.resolve_all(&rc, self.config.rc_base_dir())?;
        let rc_total = rc.len();

        let trusted = TrustFilter::new(&self.config.global_root, self.file_system.as_ref()).apply(rc);
        if trusted.len() < rc_total {
            debug!(
                "dropped {} untrusted preload rc entr(ies)",
                rc_total - trusted.len()
            );
        }

        let plan = PreloadPlan::sequence(cli, trusted);
        debug!("preload plan has {} module(s)", plan.len());
        Ok(plan)
    }

    /// Run the plan against the host's evaluator
    pub fn execute<E>(&self, plan: &PreloadPlan, evaluator: &mut E) -> Result<()>
    where
        E: ModuleEvaluator + ?Sized,
    {
        PreloadExecutor::new().run(plan, evaluator)
    }

    fn resolve_all(&self, specifiers: &[RawSpecifier], base_dir: &Path) -> Result<Vec<ResolvedModule>> {
        specifiers
            .iter()
            .map(|specifier| self.resolver.resolve(specifier, base_dir))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobalModuleRoot, RcEnable};
    use crate::errors::PreloadError;
    use crate::fs::MockFileSystem;
    use crate::specifier::SourceKind;
    use std::path::PathBuf;

    const ROOT: &str = "/usr/lib/tl_modules";
    const RC: &str = "/home/ada/.tlrun_preloadrc";

    fn config(rc: bool) -> PreloadConfig {
        let enable = if rc {
            RcEnable::enabled()
        } else {
            RcEnable::disabled()
        };
        PreloadConfig::new(GlobalModuleRoot::new(ROOT), "/work")
            .with_rc(enable, Some(PathBuf::from(RC)))
    }

    fn fixtures() -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.add_file("/fixtures/printA.tl", "print \"A\"");
        fs.add_file("/fixtures/printB.tl", "print \"B\"");
        fs.add_file("/usr/lib/tl_modules/printA.tl", "print \"A\"");
        fs.add_file("/usr/lib/tl_modules/printB.tl", "print \"B\"");
        fs
    }

    fn paths(plan: &PreloadPlan) -> Vec<String> {
        plan.identities().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_preloader_creation() {
        let preloader = Preloader::new(config(false));
        assert!(!preloader.config().rc_enable.is_enabled());
        assert_eq!(preloader.resolver().global_root().path(), Path::new(ROOT));
    }

    #[test]
    fn test_plan_without_directives_is_empty() {
        let preloader = Preloader::with_file_system(config(false), Arc::new(fixtures()));
        let plan = preloader.plan(["main.tl"]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_rc_is_ignored_when_disabled() {
        let mut fs = fixtures();
        fs.add_file(RC, "printA\n");
        let preloader = Preloader::with_file_system(config(false), Arc::new(fs));
        assert!(preloader.plan(Vec::<String>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_cli_then_rc() {
        let mut fs = fixtures();
        fs.add_file(RC, "printB\n");
        let preloader = Preloader::with_file_system(config(true), Arc::new(fs));
        let plan = preloader.plan(["-r", "/fixtures/printA.tl", "main.tl"]).unwrap();
        assert_eq!(
            paths(&plan),
            vec!["/fixtures/printA.tl", "/usr/lib/tl_modules/printB.tl"]
        );
        assert_eq!(plan.modules()[1].source().kind(), SourceKind::Rc);
    }

    #[test]
    fn test_untrusted_rc_entry_is_dropped() {
        let mut fs = fixtures();
        fs.add_file(RC, "/usr/lib/tl_modules/printA.tl\n/fixtures/printB.tl\n");
        let preloader = Preloader::with_file_system(config(true), Arc::new(fs));
        let plan = preloader.plan(["main.tl"]).unwrap();
        assert_eq!(paths(&plan), vec!["/usr/lib/tl_modules/printA.tl"]);
    }

    #[test]
    fn test_rc_bare_name_loads_global_module_despite_home_copy() {
        let mut fs = fixtures();
        fs.add_file("/home/ada/tl_modules/printA.tl", "print \"home\"");
        fs.add_file(RC, "printA\n");
        let preloader = Preloader::with_file_system(config(true), Arc::new(fs));
        let plan = preloader.plan(["main.tl"]).unwrap();
        assert_eq!(paths(&plan), vec!["/usr/lib/tl_modules/printA.tl"]);
    }

    #[test]
    fn test_rc_relative_path_outside_root_is_dropped() {
        let mut fs = fixtures();
        fs.add_file("/home/ada/mods/printA.tl", "print \"home\"");
        fs.add_file(RC, "./mods/printA\n");
        let preloader = Preloader::with_file_system(config(true), Arc::new(fs));
        assert!(preloader.plan(["main.tl"]).unwrap().is_empty());
    }

    #[test]
    fn test_cli_resolution_failure_is_fatal() {
        let preloader = Preloader::with_file_system(config(false), Arc::new(fixtures()));
        let err = preloader
            .plan(["-r", "/fixtures/printA.tl", "-r", "./nope"])
            .unwrap_err();
        assert!(matches!(err, PreloadError::Resolution { ref specifier, .. } if specifier == "./nope"));
    }

    #[test]
    fn test_rc_resolution_failure_is_fatal() {
        let mut fs = fixtures();
        fs.add_file(RC, "printA\nmissing\n");
        let preloader = Preloader::with_file_system(config(true), Arc::new(fs));
        let err = preloader.plan(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, PreloadError::Resolution { ref specifier, .. } if specifier == "missing"));
    }

    #[test]
    fn test_rc_read_failure_is_fatal() {
        let mut fs = fixtures();
        fs.add_unreadable(RC);
        let preloader = Preloader::with_file_system(config(true), Arc::new(fs));
        let err = preloader.plan(["-r", "/fixtures/printA.tl"]).unwrap_err();
        assert!(matches!(err, PreloadError::ConfigRead { .. }));
    }

    #[test]
    fn test_execute_runs_plan() {
        let preloader = Preloader::with_file_system(config(false), Arc::new(fixtures()));
        let plan = preloader
            .plan(["-r", "/fixtures/printA.tl", "-r", "/fixtures/printB.tl"])
            .unwrap();

        let fs = preloader.file_system().clone();
        let mut sources = Vec::new();
        preloader
            .execute(&plan, &mut |m: &ResolvedModule| -> anyhow::Result<()> {
                sources.push(fs.read_file(m.path())?);
                Ok(())
            })
            .unwrap();
        assert_eq!(sources, vec!["print \"A\"", "print \"B\""]);
    }
}
