mod components;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::RoleDashboard;

mod users;
pub use users::Users;

mod service_centers;
pub use service_centers::ServiceCenters;

mod register_center;
pub use register_center::RegisterServiceCenter;

mod appointments;
pub use appointments::Appointments;

mod feedback;
pub use feedback::FeedbackList;

mod loyalty;
pub use loyalty::Loyalty;

mod services;
pub use services::Services;
