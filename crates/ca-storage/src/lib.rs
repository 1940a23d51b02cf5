//! ca-storage: object storage for uploads and conversion results, plus the
//! periodic sweep that expires them.

pub mod local;
pub mod store;
pub mod sweeper;

pub use local::LocalStore;
pub use store::{
    sanitize_file_name, validate_object_path, ObjectMeta, ObjectStore, StoredObject,
    CONVERSIONS_PREFIX, UPLOADS_PREFIX,
};
pub use sweeper::{start_sweeper_task, SweepReport, Sweeper};
