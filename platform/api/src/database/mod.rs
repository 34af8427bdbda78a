mod ar_model;
mod dish;
mod model_report;
mod restaurant;
mod user;

pub use ar_model::*;
pub use dish::*;
pub use model_report::*;
pub use restaurant::*;
pub use user::*;
