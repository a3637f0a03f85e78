//! Domain models shared by storage, services and the HTTP API

pub mod athlete;
pub mod certificate;
pub mod paging;
pub mod requests;
pub mod team;

pub use athlete::Athlete;
pub use certificate::Certificate;
pub use paging::Paging;
pub use requests::{
    AddParticipationRequest, AddTeamParticipationRequest, ImportAthleteRequest, ImportTeamRequest,
};
pub use team::{Address, ColorSet, Contact, Team};

use std::collections::BTreeSet;
use uuid::Uuid;

/// Entity that records the meetings it took part in
pub trait Participant {
    fn id(&self) -> Uuid;
    fn participation(&self) -> &BTreeSet<String>;
    fn participation_mut(&mut self) -> &mut BTreeSet<String>;

    /// Add `meeting` to the participation set; false if already present
    fn record_participation(&mut self, meeting: &str) -> bool {
        self.participation_mut().insert(meeting.to_string())
    }
}

/// serde helper: omit zero/empty values like the upstream JSON documents do
pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
