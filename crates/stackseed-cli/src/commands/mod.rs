//! Command implementations.

mod doctor;
mod new;
mod retrofit;

pub use doctor::DoctorCommand;
pub use new::NewCommand;
pub use retrofit::RetrofitCommand;
