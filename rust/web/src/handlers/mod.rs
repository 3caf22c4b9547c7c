pub mod health;
pub mod levels;
pub mod session;
pub mod sse;
pub mod table;

pub use health::health;
pub use levels::list_levels;
pub use session::{
    AnswerRequest, CreateSessionRequest, create_session, deal_hand, delete_session, get_session,
    submit_answer,
};
pub use sse::stream_events;
pub use table::{TableQuery, get_table};
