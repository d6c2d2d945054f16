//! Names and values of the seeded catalog.

pub const ALBUM_TITLE: &str = "Nightfall";
pub const ALBUM_RELEASE_DATE: &str = "20230101";
pub const ALBUM_RELEASE_DATE_ISO: &str = "2023-01-01";
pub const LABEL_NAME: &str = "Umbra Records";
pub const MEDIA_TYPE: &str = "Music";

pub const TRACK_TITLE: &str = "Intro";
pub const TRACK_DURATION_SECS: i64 = 75;
pub const TRACK_DURATION_TEXT: &str = "1:15";
pub const CREATOR_NAME: &str = "J. Doe";

#[allow(dead_code)]
pub const SECOND_ALBUM_TITLE: &str = "Daybreak";
#[allow(dead_code)]
pub const SECOND_ALBUM_RELEASE_DATE: &str = "20240615";
#[allow(dead_code)]
pub const COUNTRY_NAME: &str = "Norway";
#[allow(dead_code)]
pub const GENRE_NAME: &str = "Ambient";
#[allow(dead_code)]
pub const GENRE_DESCRIPTION: &str = "Slow textures";
