pub mod process;
pub mod reference;
pub mod report;
pub mod user;

pub use process::{Process, ProcessRow};
pub use reference::{Responsible, Secretary, Status};
pub use report::{
    CountByModality, CountByMonth, CountByResponsible, CountBySecretary, StatusCount, Summary,
};
pub use user::{User, UserInfo};
