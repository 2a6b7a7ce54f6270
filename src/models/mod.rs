pub mod contractor;
pub mod formula;
pub mod job;
pub mod system;

pub use contractor::{Contractor, CreateContractor, UpdateContractor};
pub use formula::{Base, Colorant, CreateFormula, Formula, UpdateFormula};
pub use job::{Address, Contact, CreateJob, Job, UpdateJob};
pub use system::SystemInfo;
