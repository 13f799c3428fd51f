pub mod guardian;
pub mod profile;
pub mod relationship;
pub mod student;

pub use guardian::{CreateGuardian, Guardian};
pub use profile::{CreateProfile, Profile, ProfileRole};
pub use relationship::{CreateRelationship, Relationship};
pub use student::{CreateStudent, PaymentStatus, Student};
