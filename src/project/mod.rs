// Project persistence - note sessions saved as RON files

pub mod session;

pub use session::{
    SESSION_EXTENSION, SESSION_VERSION, SessionError, SessionFile, deserialize_session,
    load_session, save_session, serialize_session, validate_session, with_session_extension,
};
