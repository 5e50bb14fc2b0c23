mod home;
mod login;
mod profile;
mod quiz;
mod register;
mod shared;
mod state;
mod topics;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use login::LoginView;
pub use profile::ProfileView;
pub use quiz::QuizView;
pub use register::RegisterView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use topics::TopicsView;
