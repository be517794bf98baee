//! Positional-token dispatch.
//!
//! Selects the launcher mode from the leading positional tokens:
//!
//! | tokens                         | mode      |
//! |--------------------------------|-----------|
//! | (none)                         | usage     |
//! | `version ...`                  | version   |
//! | `run`                          | usage     |
//! | `run <path> [args...]`         | run       |
//! | `<path> [args...]`             | run       |

/// Literal token selecting version mode.
pub const VERSION_TOKEN: &str = "version";

/// Literal token optionally preceding the module path.
pub const RUN_TOKEN: &str = "run";

/// What the launcher was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and fail.
    Usage,
    /// Print the runtime version.
    Version,
    /// Run a module.
    Run {
        /// Module path exactly as typed
        module: String,
        /// Arguments following the module path
        args: Vec<String>,
    },
}

impl Invocation {
    /// Dispatches on the positional tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasi_launch_cli::dispatch::Invocation;
    ///
    /// let tokens = vec!["run".to_string(), "app.wasm".to_string(), "x".to_string()];
    /// assert_eq!(
    ///     Invocation::from_tokens(&tokens),
    ///     Invocation::Run { module: "app.wasm".to_string(), args: vec!["x".to_string()] }
    /// );
    /// ```
    #[must_use]
    pub fn from_tokens(tokens: &[String]) -> Self {
        let rest = match tokens {
            [] => return Self::Usage,
            [first, ..] if first == VERSION_TOKEN => return Self::Version,
            [first, rest @ ..] if first == RUN_TOKEN => rest,
            all => all,
        };

        match rest {
            [] => Self::Usage,
            [module, args @ ..] => Self::Run {
                module: module.clone(),
                args: args.to_vec(),
            },
        }
    }
}

/// Builds the guest argument vector: the module path followed by `args`.
#[must_use]
pub fn module_argv(module: &str, args: &[String]) -> Vec<String> {
    std::iter::once(module.to_string())
        .chain(args.iter().cloned())
        .collect()
}
