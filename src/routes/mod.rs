pub mod attendance;

pub mod exams;

pub mod grades;

pub mod messages;

pub mod websocket;

pub use attendance::configure_attendance_routes;
pub use exams::configure_exams_routes;
pub use grades::configure_grades_routes;
pub use messages::configure_messages_routes;
pub use websocket::configure_websocket_routes;
