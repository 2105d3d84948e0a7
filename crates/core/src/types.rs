/// Videos are identified by UUID.
pub type VideoId = uuid::Uuid;

/// Characters are identified by UUID.
pub type CharacterId = uuid::Uuid;

/// Users (JWT subjects) are identified by UUID.
pub type UserId = uuid::Uuid;

/// Media time in seconds from the start of the video.
pub type Seconds = f64;
