pub mod flows;
pub mod session;
pub mod store;

pub use flows::{FlowError, ProfileEdit, ProfileFlows, Role, WorkerEdit};
pub use session::{LocalSession, SessionProvider, UserId};
pub use store::{Filter, InMemoryRecordStore, Record, RecordStore, StoreError};
