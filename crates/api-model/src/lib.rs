//! Android API Model
//!
//! The merged, since-annotated API surface: which level introduced each
//! class, superclass link, interface link, method and field. Includes the
//! writer for the versioned API database and a reader for the same format.

pub mod class;
pub mod element;
pub mod model;
pub mod reader;
pub mod writer;

pub use class::{method_key, ApiClass};
pub use element::{ApiElement, ApiField};
pub use model::{ApiModel, ModelStats};
pub use reader::ApiReader;
pub use writer::{ApiWriter, API_FILE_VERSION};
