pub mod access;
pub mod attendance;
pub mod exams;
pub mod grades;
pub mod messages;
pub mod websocket;

pub use attendance::AttendanceService;
pub use exams::ExamService;
pub use grades::GradeService;
pub use messages::MessageService;
pub use websocket::{PresenceRouter, WebSocketService};
