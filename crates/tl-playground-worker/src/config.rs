//! Compiler configuration.

/// Lua `package.path` used when `TL_PACKAGE_PATH` is unset.
pub const DEFAULT_PACKAGE_PATH: &str = "./?.lua;./tl/?.lua";

/// Environment variable holding the Lua search path for `tl.lua`.
pub const PACKAGE_PATH_VAR: &str = "TL_PACKAGE_PATH";

/// Environment variable enabling lax mode.
pub const LAX_VAR: &str = "TL_LAX";

/// Positional flags passed to `tl.init_env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitEnv {
    pub lax: bool,
    pub gen_compat: bool,
    pub gen_target: bool,
}

impl Default for InitEnv {
    fn default() -> Self {
        Self {
            lax: false,
            gen_compat: false,
            gen_target: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Value assigned to `package.path` before `require('tl')`.
    pub package_path: String,
    pub init_env: InitEnv,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            package_path: DEFAULT_PACKAGE_PATH.to_string(),
            init_env: InitEnv::default(),
        }
    }
}

impl CompilerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(PACKAGE_PATH_VAR).filter(|p| !p.is_empty()) {
            config.package_path = path;
        }
        if let Some(lax) = lookup(LAX_VAR) {
            config.init_env.lax = matches!(lax.as_str(), "1" | "true" | "yes");
        }
        config
    }

    pub fn with_package_path(mut self, path: impl Into<String>) -> Self {
        self.package_path = path.into();
        self
    }

    pub fn with_lax(mut self, lax: bool) -> Self {
        self.init_env.lax = lax;
        self
    }
}
