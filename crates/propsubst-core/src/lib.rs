//! propsubst-core: placeholder substitution for flat key-value configuration
//!
//! Values may reference other keys with `${key}` tokens. The [`Resolver`]
//! expands them on lookup, recursively, and reports circular references
//! instead of looping.
//!
//! # Example
//!
//! ```rust
//! use propsubst_core::Resolver;
//!
//! let resolver: Resolver = [
//!     ("FOO", "foo"),
//!     ("BAR", "bar"),
//!     ("BAZ", "${FOO} is ${BAR}"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(resolver.get("BAZ").unwrap().as_deref(), Some("foo is bar"));
//! assert_eq!(resolver.get("QUX").unwrap(), None);
//! assert_eq!(resolver.get_or_default("QUX", "none").unwrap(), "none");
//! ```

pub mod error;
pub mod interpolation;
pub mod options;
pub mod resolver;
pub mod source;

pub use error::{Error, ErrorKind, Result};
pub use options::{MissingKeyPolicy, ResolverOptions};
pub use resolver::Resolver;
pub use source::PropertySource;
