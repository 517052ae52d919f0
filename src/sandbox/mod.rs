//! Filesystem sandbox
//!
//! Path-consuming tools call these before touching the filesystem:
//! - [`validate_resource`]: stateless traversal and system-directory checks
//! - [`SandboxValidator::validate_path`]: configured deny/allow prefixes
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut sandbox = SandboxValidator::new();
//! sandbox.add_denied_path("/etc");
//! sandbox.add_allowed_path("/home");
//!
//! validate_resource(path)?;
//! sandbox.validate_path(path)?;
//! ```

mod policy;
mod resource;
mod validator;

pub use policy::PathPolicy;
pub use resource::validate_resource;
pub use validator::SandboxValidator;
