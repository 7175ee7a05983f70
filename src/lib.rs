// src/lib.rs

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod chart;
pub mod cities;
pub mod config;
mod ephemeris;
pub mod error;
pub mod form;
pub mod render;

pub use ephemeris::*;
pub use error::{AstrologyError, Result};

// ---------------------------
// ## Enumerations
// ---------------------------

/// Selects how longitudes are measured before they are split into signs.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Zodiac {
    #[default]
    Tropical,
    /// Tropical longitude minus the Lahiri ayanamsa.
    Sidereal,
}

/// Which equatorial or ecliptic coordinate is reduced to a sign.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Reference {
    /// Ecliptic longitude.
    Ecliptic,
    /// Right ascension read as a longitude.
    #[default]
    RightAscension,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CelestialBody {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

impl CelestialBody {
    /// The seven classical planets, in chart order.
    pub fn classical() -> impl Iterator<Item = CelestialBody> {
        [
            CelestialBody::Sun,
            CelestialBody::Moon,
            CelestialBody::Mars,
            CelestialBody::Mercury,
            CelestialBody::Jupiter,
            CelestialBody::Venus,
            CelestialBody::Saturn,
        ]
        .iter()
        .copied()
    }

    pub fn nodes() -> impl Iterator<Item = CelestialBody> {
        [CelestialBody::Rahu, CelestialBody::Ketu].iter().copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mars => "Mars",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Venus => "Venus",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Rahu => "Rahu",
            CelestialBody::Ketu => "Ketu",
        }
    }

    /// Bodies whose apparent motion can reverse. The luminaries never do and
    /// the mean nodes always move backwards.
    pub fn can_retrograde(&self) -> bool {
        matches!(
            self,
            CelestialBody::Mars
                | CelestialBody::Mercury
                | CelestialBody::Jupiter
                | CelestialBody::Venus
                | CelestialBody::Saturn
        )
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum House {
    First = 1,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl House {
    pub fn from_index(index: usize) -> Option<House> {
        match index {
            1 => Some(House::First),
            2 => Some(House::Second),
            3 => Some(House::Third),
            4 => Some(House::Fourth),
            5 => Some(House::Fifth),
            6 => Some(House::Sixth),
            7 => Some(House::Seventh),
            8 => Some(House::Eighth),
            9 => Some(House::Ninth),
            10 => Some(House::Tenth),
            11 => Some(House::Eleventh),
            12 => Some(House::Twelfth),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = House> {
        (1..=12).filter_map(House::from_index)
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn from_longitude(longitude: f64) -> Self {
        let normalized_longitude = normalize_longitude(longitude);
        let sign_index = (normalized_longitude / 30.0).floor() as usize;
        Self::ALL[sign_index.min(11)]
    }

    /// Signs are numbered 1 (Aries) through 12 (Pisces).
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=12 => Some(Self::ALL[number as usize - 1]),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign_str = match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        };
        write!(f, "{}", sign_str)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    PurvaPhalguni,
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Moola,
    PurvaAshadha,
    UttaraAshadha,
    Shravana,
    Dhanishta,
    Shatabhisha,
    PurvaBhadrapada,
    UttaraBhadrapada,
    Revati,
}

impl Nakshatra {
    const ALL: [Nakshatra; 27] = [
        Nakshatra::Ashwini,
        Nakshatra::Bharani,
        Nakshatra::Krittika,
        Nakshatra::Rohini,
        Nakshatra::Mrigashira,
        Nakshatra::Ardra,
        Nakshatra::Punarvasu,
        Nakshatra::Pushya,
        Nakshatra::Ashlesha,
        Nakshatra::Magha,
        Nakshatra::PurvaPhalguni,
        Nakshatra::UttaraPhalguni,
        Nakshatra::Hasta,
        Nakshatra::Chitra,
        Nakshatra::Swati,
        Nakshatra::Vishakha,
        Nakshatra::Anuradha,
        Nakshatra::Jyeshtha,
        Nakshatra::Moola,
        Nakshatra::PurvaAshadha,
        Nakshatra::UttaraAshadha,
        Nakshatra::Shravana,
        Nakshatra::Dhanishta,
        Nakshatra::Shatabhisha,
        Nakshatra::PurvaBhadrapada,
        Nakshatra::UttaraBhadrapada,
        Nakshatra::Revati,
    ];

    pub fn from_longitude(longitude: f64) -> Self {
        Self::ALL[pada_index(longitude) / 4]
    }

    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }
}

impl fmt::Display for Nakshatra {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Nakshatra::PurvaPhalguni => "Purva Phalguni",
            Nakshatra::UttaraPhalguni => "Uttara Phalguni",
            Nakshatra::PurvaAshadha => "Purva Ashadha",
            Nakshatra::UttaraAshadha => "Uttara Ashadha",
            Nakshatra::PurvaBhadrapada => "Purva Bhadrapada",
            Nakshatra::UttaraBhadrapada => "Uttara Bhadrapada",
            other => return write!(f, "{:?}", other),
        };
        write!(f, "{}", name)
    }
}

// ---------------------------
// ## Structures
// ---------------------------

pub type JulianDay = f64;

pub const J2000: JulianDay = 2451545.0;
pub const UNIX_EPOCH_JD: JulianDay = 2440587.5;
pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

/// Index of the 3°20′ pada containing `longitude`, 0 to 107. Scaling by 108
/// before dividing keeps whole-pada boundaries such as 40° exact.
fn pada_index(longitude: f64) -> usize {
    let index = (normalize_longitude(longitude) * 108.0 / 360.0).floor() as usize;
    index.min(107)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialCoordinates {
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    pub right_ascension: f64,
    pub declination: f64,
    pub speed_longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NakshatraInfo {
    pub nakshatra: Nakshatra,
    pub pada: u8,
    pub lord: CelestialBody,
}

impl NakshatraInfo {
    pub fn from_longitude(longitude: f64) -> NakshatraInfo {
        let quarter = pada_index(longitude);
        let nakshatra = Nakshatra::ALL[quarter / 4];
        NakshatraInfo {
            nakshatra,
            pada: (quarter % 4) as u8 + 1,
            lord: NakshatraInfo::get_nakshatra_lord(nakshatra),
        }
    }

    /// Vimshottari lords repeat every nine mansions starting from Ketu.
    pub fn get_nakshatra_lord(nakshatra: Nakshatra) -> CelestialBody {
        const LORDS: [CelestialBody; 9] = [
            CelestialBody::Ketu,
            CelestialBody::Venus,
            CelestialBody::Sun,
            CelestialBody::Moon,
            CelestialBody::Mars,
            CelestialBody::Rahu,
            CelestialBody::Jupiter,
            CelestialBody::Saturn,
            CelestialBody::Mercury,
        ];
        LORDS[(nakshatra as usize) % 9]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AyanamsaInfo {
    pub ayanamsa_name: String,
    pub ayanamsa_value: f64,
}

impl AyanamsaInfo {
    pub fn calculate(julian_day: JulianDay) -> Self {
        calculate_ayanamsa(julian_day)
    }
}

/// Geographic position in degrees, east longitude positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AstrologyError::InvalidInput(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AstrologyError::InvalidInput(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Location {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub date_time: DateTime<Utc>,
    pub location: Location,
}

impl BirthInfo {
    pub fn new(date_time: DateTime<Utc>, location: Location) -> Self {
        BirthInfo {
            date_time,
            location,
        }
    }

    /// Builds a birth moment from wall-clock fields at the given UTC offset.
    pub fn from_local(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        offset: FixedOffset,
        location: Location,
    ) -> Result<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| {
                AstrologyError::InvalidInput(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02} is not a valid date and time"
                ))
            })?;
        let local = offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| AstrologyError::InvalidInput(format!("ambiguous local time {naive}")))?;
        Ok(BirthInfo::new(local.with_timezone(&Utc), location))
    }

    pub fn julian_day(&self) -> JulianDay {
        date_to_julian_day(self.date_time)
    }

    pub fn generate_chart(&self, settings: ChartSettings) -> Result<ChartInfo> {
        Ephemeris::new().calculate_chart(self, settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub zodiac: Zodiac,
    pub reference: Reference,
    pub include_nodes: bool,
    pub topocentric: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            zodiac: Zodiac::Tropical,
            reference: Reference::RightAscension,
            include_nodes: false,
            topocentric: true,
        }
    }
}

impl ChartSettings {
    pub fn bodies(&self) -> Vec<CelestialBody> {
        let mut bodies: Vec<CelestialBody> = CelestialBody::classical().collect();
        if self.include_nodes {
            bodies.extend(CelestialBody::nodes());
        }
        bodies
    }
}

/// A longitude reduced to its sign and the degree within that sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPosition {
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree: f64,
}

impl SignPosition {
    pub fn from_longitude(longitude: f64) -> Result<Self> {
        if !longitude.is_finite() {
            return Err(AstrologyError::Calculation(format!(
                "non-finite longitude {longitude}"
            )));
        }
        let longitude = normalize_longitude(longitude);
        Ok(SignPosition {
            longitude,
            sign: ZodiacSign::from_longitude(longitude),
            degree: degree_in_sign(longitude),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub planet: CelestialBody,
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree: f64,
    pub nakshatra: NakshatraInfo,
    pub speed: f64,
    pub retrograde: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInfo {
    pub birth_info: BirthInfo,
    pub settings: ChartSettings,
    pub ayanamsa: AyanamsaInfo,
    pub ascendant: SignPosition,
    pub planets: Vec<PlanetPosition>,
}

impl ChartInfo {
    pub fn planet(&self, body: CelestialBody) -> Option<&PlanetPosition> {
        self.planets.iter().find(|p| p.planet == body)
    }
}

// ---------------------------
// ## Utility Functions
// ---------------------------

pub fn date_to_julian_day(date_time: DateTime<Utc>) -> JulianDay {
    let seconds =
        date_time.timestamp() as f64 + date_time.timestamp_subsec_nanos() as f64 / 1_000_000_000.0;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

pub fn julian_day_to_date(jd: JulianDay) -> Result<DateTime<Utc>> {
    if !jd.is_finite() {
        return Err(AstrologyError::Calculation(format!("invalid Julian day {jd}")));
    }
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round() as i64;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AstrologyError::Calculation(format!("Julian day {jd} is out of range")))
}

/// Maps any finite angle into [0, 360).
pub fn normalize_longitude(longitude: f64) -> f64 {
    let normalized = longitude.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

pub fn degree_in_sign(longitude: f64) -> f64 {
    let degree = normalize_longitude(longitude) % 30.0;
    if degree >= 30.0 {
        0.0
    } else {
        degree
    }
}

/// Lahiri ayanamsa, linear in time from its J2000 value.
pub fn calculate_ayanamsa(julian_day: JulianDay) -> AyanamsaInfo {
    const LAHIRI_J2000: f64 = 23.85306;
    const PRECESSION_PER_YEAR: f64 = 50.2788 / 3600.0;
    let years = (julian_day - J2000) / 365.25;
    AyanamsaInfo {
        ayanamsa_name: "Lahiri".to_string(),
        ayanamsa_value: LAHIRI_J2000 + PRECESSION_PER_YEAR * years,
    }
}

/// Parses `+05:30`, `-0400`, `+5` or `Z` into a fixed UTC offset.
pub fn parse_utc_offset(offset: &str) -> Result<FixedOffset> {
    let invalid = || AstrologyError::InvalidInput(format!("invalid UTC offset '{offset}'"));
    let trimmed = offset.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn julian_day_of_j2000_epoch() {
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(date_to_julian_day(epoch), J2000, epsilon = 1e-9);
    }

    #[test]
    fn julian_day_converts_back_to_the_same_second() {
        let date = Utc.with_ymd_and_hms(1991, 6, 18, 7, 10, 0).unwrap();
        let jd = date_to_julian_day(date);
        assert_eq!(julian_day_to_date(jd).unwrap(), date);
        assert!(julian_day_to_date(f64::NAN).is_err());
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_abs_diff_eq!(normalize_longitude(370.0), 10.0);
        assert_abs_diff_eq!(normalize_longitude(-30.0), 330.0);
        assert_abs_diff_eq!(normalize_longitude(720.0), 0.0);
        assert!(normalize_longitude(-1e-17) < 360.0);
    }

    #[test]
    fn signs_are_numbered_from_aries() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(359.9).number(), 12);
        assert_eq!(ZodiacSign::from_longitude(-15.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_number(5), Some(ZodiacSign::Leo));
        assert_eq!(ZodiacSign::from_number(13), None);
    }

    #[test]
    fn sign_position_splits_degree() {
        let position = SignPosition::from_longitude(405.5).unwrap();
        assert_eq!(position.sign, ZodiacSign::Taurus);
        assert_abs_diff_eq!(position.degree, 15.5, epsilon = 1e-9);
        assert!(SignPosition::from_longitude(f64::INFINITY).is_err());
    }

    #[test]
    fn nakshatra_boundaries_and_lords() {
        let info = NakshatraInfo::from_longitude(0.0);
        assert_eq!(info.nakshatra, Nakshatra::Ashwini);
        assert_eq!(info.pada, 1);
        assert_eq!(info.lord, CelestialBody::Ketu);

        let info = NakshatraInfo::from_longitude(359.99);
        assert_eq!(info.nakshatra, Nakshatra::Revati);
        assert_eq!(info.pada, 4);
        assert_eq!(info.lord, CelestialBody::Mercury);

        assert_eq!(
            NakshatraInfo::get_nakshatra_lord(Nakshatra::Magha),
            CelestialBody::Ketu
        );
        assert_eq!(Nakshatra::from_longitude(130.0), Nakshatra::Magha);
    }

    #[test]
    fn pada_starts_at_one_on_mansion_boundaries() {
        for (longitude, nakshatra) in [
            (40.0, Nakshatra::Rohini),
            (40.0 / 3.0, Nakshatra::Bharani),
            (120.0, Nakshatra::Magha),
        ] {
            let info = NakshatraInfo::from_longitude(longitude);
            assert_eq!(info.nakshatra, nakshatra, "{longitude}");
            assert_eq!(info.pada, 1, "{longitude}");
            assert_eq!(Nakshatra::from_longitude(longitude), nakshatra);
        }
        let info = NakshatraInfo::from_longitude(39.999);
        assert_eq!((info.nakshatra, info.pada), (Nakshatra::Krittika, 4));
        let info = NakshatraInfo::from_longitude(43.4);
        assert_eq!((info.nakshatra, info.pada), (Nakshatra::Rohini, 2));
    }

    #[test]
    fn location_bounds_are_checked() {
        assert!(Location::new(28.7041, 77.1025).is_ok());
        assert!(Location::new(91.0, 0.0).is_err());
        assert!(Location::new(0.0, -180.5).is_err());
    }

    #[test]
    fn local_time_is_shifted_to_utc() {
        let offset = parse_utc_offset("+05:30").unwrap();
        let location = Location::new(28.7041, 77.1025).unwrap();
        let birth = BirthInfo::from_local(2024, 7, 14, 12, 0, offset, location).unwrap();
        assert_eq!(
            birth.date_time,
            Utc.with_ymd_and_hms(2024, 7, 14, 6, 30, 0).unwrap()
        );
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let location = Location::new(0.0, 0.0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let err = BirthInfo::from_local(2023, 2, 30, 0, 0, utc, location).unwrap_err();
        assert!(matches!(err, AstrologyError::InvalidInput(_)));
    }

    #[test]
    fn utc_offsets_parse() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("-04:00").unwrap().local_minus_utc(), -4 * 3600);
        assert_eq!(parse_utc_offset("+0545").unwrap().local_minus_utc(), 5 * 3600 + 45 * 60);
        assert_eq!(parse_utc_offset("+9").unwrap().local_minus_utc(), 9 * 3600);
        assert!(parse_utc_offset("05:30").is_err());
        assert!(parse_utc_offset("+05:75").is_err());
    }

    #[test]
    fn lahiri_ayanamsa_near_j2000() {
        let info = calculate_ayanamsa(J2000);
        assert_eq!(info.ayanamsa_name, "Lahiri");
        assert_abs_diff_eq!(info.ayanamsa_value, 23.853, epsilon = 1e-3);
        let later = calculate_ayanamsa(J2000 + 365.25 * 24.0);
        assert_abs_diff_eq!(later.ayanamsa_value, 24.188, epsilon = 5e-3);
    }
}
