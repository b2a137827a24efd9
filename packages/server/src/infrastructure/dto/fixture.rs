//! Startup fixture file: `{"users": [...], "events": [...]}`.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{DomainError, Event, EventId, GeoPoint, UserId, UserProfile};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub events: Vec<EventFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFixture {
    pub id: String,
    pub display_name: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventFixture {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl TryFrom<UserFixture> for UserProfile {
    type Error = DomainError;

    fn try_from(fixture: UserFixture) -> Result<Self, Self::Error> {
        Ok(UserProfile::new(
            UserId::new(fixture.id)?,
            fixture.display_name,
            fixture.photo_url,
        ))
    }
}

impl TryFrom<EventFixture> for Event {
    type Error = DomainError;

    fn try_from(fixture: EventFixture) -> Result<Self, Self::Error> {
        Ok(Event::new(
            EventId::new(fixture.id)?,
            GeoPoint::new(fixture.latitude, fixture.longitude)?,
            fixture.attributes,
        ))
    }
}
