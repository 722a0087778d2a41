pub mod debate;
pub mod loaders;
pub mod notification;
pub mod turn;

pub use debate::{DebateConfiguration, Difficulty, ExpertiseLevel, ResponseMode, Stance};
pub use loaders::{load_preset, parse_query, to_query_string};
pub use notification::{Notification, NotificationKind};
pub use turn::{Speaker, Transcript, Turn};
