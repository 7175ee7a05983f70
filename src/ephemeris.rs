//! Low-precision analytic ephemeris.
//!
//! Positions come from mean orbital elements referred to the equinox of
//! date, solved through Kepler's equation and corrected by the largest
//! periodic terms for the Moon, Jupiter and Saturn. Accuracy is roughly one
//! arc-minute for the Sun and planets and a few arc-minutes for the Moon
//! between 1900 and 2100.

use super::*;
use tracing::{debug, trace};

/// Day zero of the element series: 1999-12-31 00:00 UT.
const ELEMENT_EPOCH: JulianDay = 2451543.5;

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 30;

/// Half-width of the window used to difference longitudes into a daily speed.
const SPEED_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    fn from_spherical(longitude: f64, latitude: f64, distance: f64) -> Self {
        let (lon, lat) = (longitude.to_radians(), latitude.to_radians());
        Vector3 {
            x: distance * lon.cos() * lat.cos(),
            y: distance * lon.sin() * lat.cos(),
            z: distance * lat.sin(),
        }
    }

    fn longitude(&self) -> f64 {
        normalize_longitude(self.y.atan2(self.x).to_degrees())
    }

    fn latitude(&self) -> f64 {
        self.z.atan2(self.x.hypot(self.y)).to_degrees()
    }

    fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn add(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Rotates ecliptic rectangular coordinates onto the equator and returns
    /// right ascension and declination in degrees.
    fn to_equatorial(&self, obliquity: f64) -> (f64, f64) {
        let eps = obliquity.to_radians();
        let xe = self.x;
        let ye = self.y * eps.cos() - self.z * eps.sin();
        let ze = self.y * eps.sin() + self.z * eps.cos();
        let right_ascension = normalize_longitude(ye.atan2(xe).to_degrees());
        let declination = ze.atan2(xe.hypot(ye)).to_degrees();
        (right_ascension, declination)
    }
}

/// Keplerian elements, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbitalElements {
    node: f64,
    inclination: f64,
    perihelion: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    mean_anomaly: f64,
}

impl OrbitalElements {
    /// Elements for day number `d` counted from [`ELEMENT_EPOCH`]. The Sun's
    /// elements describe the Earth-Sun vector seen from the Earth.
    fn for_body(body: CelestialBody, d: f64) -> Option<Self> {
        let elements = match body {
            CelestialBody::Sun => OrbitalElements {
                node: 0.0,
                inclination: 0.0,
                perihelion: 282.9404 + 4.70935e-5 * d,
                semi_major_axis: 1.0,
                eccentricity: 0.016709 - 1.151e-9 * d,
                mean_anomaly: 356.0470 + 0.9856002585 * d,
            },
            CelestialBody::Moon => OrbitalElements {
                node: 125.1228 - 0.0529538083 * d,
                inclination: 5.1454,
                perihelion: 318.0634 + 0.1643573223 * d,
                semi_major_axis: 60.2666,
                eccentricity: 0.054900,
                mean_anomaly: 115.3654 + 13.0649929509 * d,
            },
            CelestialBody::Mercury => OrbitalElements {
                node: 48.3313 + 3.24587e-5 * d,
                inclination: 7.0047 + 5.00e-8 * d,
                perihelion: 29.1241 + 1.01444e-5 * d,
                semi_major_axis: 0.387098,
                eccentricity: 0.205635 + 5.59e-10 * d,
                mean_anomaly: 168.6562 + 4.0923344368 * d,
            },
            CelestialBody::Venus => OrbitalElements {
                node: 76.6799 + 2.46590e-5 * d,
                inclination: 3.3946 + 2.75e-8 * d,
                perihelion: 54.8910 + 1.38374e-5 * d,
                semi_major_axis: 0.723330,
                eccentricity: 0.006773 - 1.302e-9 * d,
                mean_anomaly: 48.0052 + 1.6021302244 * d,
            },
            CelestialBody::Mars => OrbitalElements {
                node: 49.5574 + 2.11081e-5 * d,
                inclination: 1.8497 - 1.78e-8 * d,
                perihelion: 286.5016 + 2.92961e-5 * d,
                semi_major_axis: 1.523688,
                eccentricity: 0.093405 + 2.516e-9 * d,
                mean_anomaly: 18.6021 + 0.5240207766 * d,
            },
            CelestialBody::Jupiter => OrbitalElements {
                node: 100.4542 + 2.76854e-5 * d,
                inclination: 1.3030 - 1.557e-7 * d,
                perihelion: 273.8777 + 1.64505e-5 * d,
                semi_major_axis: 5.20256,
                eccentricity: 0.048498 + 4.469e-9 * d,
                mean_anomaly: 19.8950 + 0.0830853001 * d,
            },
            CelestialBody::Saturn => OrbitalElements {
                node: 113.6634 + 2.38980e-5 * d,
                inclination: 2.4886 - 1.081e-7 * d,
                perihelion: 339.3939 + 2.97661e-5 * d,
                semi_major_axis: 9.55475,
                eccentricity: 0.055546 - 9.499e-9 * d,
                mean_anomaly: 316.9670 + 0.0334442282 * d,
            },
            CelestialBody::Rahu | CelestialBody::Ketu => return None,
        };
        Some(elements)
    }

    /// Rectangular ecliptic position relative to the focus of the orbit.
    fn position(&self) -> Result<Vector3> {
        let e = self.eccentricity;
        let mean_anomaly = normalize_longitude(self.mean_anomaly).to_radians();
        let eccentric_anomaly = solve_kepler(mean_anomaly, e)?;

        let xv = self.semi_major_axis * (eccentric_anomaly.cos() - e);
        let yv = self.semi_major_axis * (1.0 - e * e).sqrt() * eccentric_anomaly.sin();
        let true_anomaly = yv.atan2(xv);
        let radius = xv.hypot(yv);

        let node = self.node.to_radians();
        let inclination = self.inclination.to_radians();
        let arg = true_anomaly + self.perihelion.to_radians();
        Ok(Vector3 {
            x: radius * (node.cos() * arg.cos() - node.sin() * arg.sin() * inclination.cos()),
            y: radius * (node.sin() * arg.cos() + node.cos() * arg.sin() * inclination.cos()),
            z: radius * arg.sin() * inclination.sin(),
        })
    }
}

/// Newton iteration on `E - e sin E = M`, all in radians.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64> {
    let e = eccentricity;
    let mut eccentric_anomaly =
        mean_anomaly + e * mean_anomaly.sin() * (1.0 + e * mean_anomaly.cos());
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (eccentric_anomaly - e * eccentric_anomaly.sin() - mean_anomaly)
            / (1.0 - e * eccentric_anomaly.cos());
        eccentric_anomaly -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Ok(eccentric_anomaly);
        }
    }
    Err(AstrologyError::Calculation(format!(
        "Kepler's equation did not converge for M = {mean_anomaly}, e = {eccentricity}"
    )))
}

fn sin_deg(angle: f64) -> f64 {
    angle.to_radians().sin()
}

fn cos_deg(angle: f64) -> f64 {
    angle.to_radians().cos()
}

/// Days since [`ELEMENT_EPOCH`].
fn day_number(jd: JulianDay) -> f64 {
    jd - ELEMENT_EPOCH
}

/// Mean obliquity of the ecliptic in degrees.
pub fn obliquity(jd: JulianDay) -> f64 {
    23.4393 - 3.563e-7 * day_number(jd)
}

/// Greenwich mean sidereal time in degrees.
pub fn greenwich_sidereal_time(jd: JulianDay) -> f64 {
    let t = (jd - J2000) / 36525.0;
    normalize_longitude(
        280.46061837 + 360.98564736629 * (jd - J2000) + 0.000387933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Local sidereal time in degrees for an east-positive longitude.
pub fn local_sidereal_time(jd: JulianDay, longitude: f64) -> f64 {
    normalize_longitude(greenwich_sidereal_time(jd) + longitude)
}

/// Longitude, latitude and distance corrections for the Moon, from the
/// mean anomalies and arguments of the Sun and Moon.
fn lunar_perturbations(sun: &OrbitalElements, moon: &OrbitalElements) -> (f64, f64, f64) {
    let ms = sun.mean_anomaly;
    let mm = moon.mean_anomaly;
    let ls = sun.mean_anomaly + sun.perihelion;
    let lm = moon.mean_anomaly + moon.perihelion + moon.node;
    let d = lm - ls;
    let f = lm - moon.node;

    let longitude = -1.274 * sin_deg(mm - 2.0 * d)
        + 0.658 * sin_deg(2.0 * d)
        - 0.186 * sin_deg(ms)
        - 0.059 * sin_deg(2.0 * mm - 2.0 * d)
        - 0.057 * sin_deg(mm - 2.0 * d + ms)
        + 0.053 * sin_deg(mm + 2.0 * d)
        + 0.046 * sin_deg(2.0 * d - ms)
        + 0.041 * sin_deg(mm - ms)
        - 0.035 * sin_deg(d)
        - 0.031 * sin_deg(mm + ms)
        - 0.015 * sin_deg(2.0 * f - 2.0 * d)
        + 0.011 * sin_deg(mm - 4.0 * d);

    let latitude = -0.173 * sin_deg(f - 2.0 * d)
        - 0.055 * sin_deg(mm - f - 2.0 * d)
        - 0.046 * sin_deg(mm + f - 2.0 * d)
        + 0.033 * sin_deg(f + 2.0 * d)
        + 0.017 * sin_deg(2.0 * mm + f);

    let distance = -0.58 * cos_deg(mm - 2.0 * d) - 0.46 * cos_deg(2.0 * d);

    (longitude, latitude, distance)
}

/// Great-inequality terms between Jupiter and Saturn, as heliocentric
/// longitude and latitude corrections for `body`.
fn giant_perturbations(body: CelestialBody, d: f64) -> (f64, f64) {
    let mj = 19.8950 + 0.0830853001 * d;
    let ms = 316.9670 + 0.0334442282 * d;
    match body {
        CelestialBody::Jupiter => (
            -0.332 * sin_deg(2.0 * mj - 5.0 * ms - 67.6)
                - 0.056 * sin_deg(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sin_deg(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sin_deg(mj - 2.0 * ms)
                + 0.022 * cos_deg(mj - ms)
                + 0.023 * sin_deg(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sin_deg(mj - 5.0 * ms - 69.0),
            0.0,
        ),
        CelestialBody::Saturn => (
            0.812 * sin_deg(2.0 * mj - 5.0 * ms - 67.6)
                - 0.229 * cos_deg(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sin_deg(mj - 2.0 * ms - 3.0)
                + 0.046 * sin_deg(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sin_deg(mj - 3.0 * ms + 32.0),
            -0.020 * cos_deg(2.0 * mj - 4.0 * ms - 2.0)
                + 0.018 * sin_deg(2.0 * mj - 6.0 * ms - 49.0),
        ),
        _ => (0.0, 0.0),
    }
}

/// Converts equatorial coordinates back to ecliptic longitude and latitude.
fn equatorial_to_ecliptic(right_ascension: f64, declination: f64, obliquity: f64) -> (f64, f64) {
    let (ra, dec, eps) = (
        right_ascension.to_radians(),
        declination.to_radians(),
        obliquity.to_radians(),
    );
    let longitude = (ra.sin() * eps.cos() + dec.tan() * eps.sin()).atan2(ra.cos());
    let latitude = (dec.sin() * eps.cos() - dec.cos() * eps.sin() * ra.sin()).asin();
    (
        normalize_longitude(longitude.to_degrees()),
        latitude.to_degrees(),
    )
}

/// Shifts geocentric lunar RA/Dec to the observer's position on the surface.
/// `distance` is in Earth radii.
fn lunar_parallax(
    right_ascension: f64,
    declination: f64,
    distance: f64,
    jd: JulianDay,
    observer: &Location,
) -> (f64, f64) {
    let parallax = (1.0 / distance).asin();
    let lat = observer.latitude;
    let geocentric_lat = (lat - 0.1924 * sin_deg(2.0 * lat)).to_radians();
    let rho = 0.99833 + 0.00167 * cos_deg(2.0 * lat);
    let hour_angle = (local_sidereal_time(jd, observer.longitude) - right_ascension).to_radians();
    let dec = declination.to_radians();

    let top_ra = right_ascension.to_radians()
        - parallax * rho * geocentric_lat.cos() * hour_angle.sin() / dec.cos();
    let top_dec = dec
        - parallax
            * rho
            * (geocentric_lat.sin() * dec.cos()
                - geocentric_lat.cos() * hour_angle.cos() * dec.sin());
    (normalize_longitude(top_ra.to_degrees()), top_dec.to_degrees())
}

// ---------------------------
// ## Ephemeris
// ---------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct Ephemeris;

impl Ephemeris {
    pub fn new() -> Self {
        Ephemeris
    }

    /// Position of `body` at `julian_day`, with its daily motion in longitude.
    /// The Moon is corrected for parallax when an observer is given and
    /// `topocentric` is set.
    pub fn calculate(
        &self,
        body: CelestialBody,
        julian_day: JulianDay,
        observer: Option<&Location>,
        topocentric: bool,
    ) -> Result<CelestialCoordinates> {
        if !julian_day.is_finite() {
            return Err(AstrologyError::Calculation(format!(
                "invalid Julian day {julian_day}"
            )));
        }
        let observer = observer.filter(|_| topocentric);
        let mut coordinates = self.position(body, julian_day, observer)?;

        let before = self.position(body, julian_day - SPEED_STEP, observer)?;
        let after = self.position(body, julian_day + SPEED_STEP, observer)?;
        let mut delta = after.longitude - before.longitude;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        coordinates.speed_longitude = delta / (2.0 * SPEED_STEP);

        trace!(
            body = body.name(),
            julian_day,
            longitude = coordinates.longitude,
            right_ascension = coordinates.right_ascension,
            "computed position"
        );
        Ok(coordinates)
    }

    fn position(
        &self,
        body: CelestialBody,
        julian_day: JulianDay,
        observer: Option<&Location>,
    ) -> Result<CelestialCoordinates> {
        let d = day_number(julian_day);
        let eps = obliquity(julian_day);

        let ecliptic = match body {
            CelestialBody::Rahu | CelestialBody::Ketu => {
                let mut node = 125.1228 - 0.0529538083 * d;
                if body == CelestialBody::Ketu {
                    node += 180.0;
                }
                // Mean lunar distance; the node is a direction, not a body.
                Vector3::from_spherical(normalize_longitude(node), 0.0, 60.2666)
            }
            CelestialBody::Sun => self.sun_vector(d)?,
            CelestialBody::Moon => {
                let sun = elements(CelestialBody::Sun, d)?;
                let moon = elements(CelestialBody::Moon, d)?;
                let geocentric = moon.position()?;
                let (dlon, dlat, ddist) = lunar_perturbations(&sun, &moon);
                Vector3::from_spherical(
                    geocentric.longitude() + dlon,
                    geocentric.latitude() + dlat,
                    geocentric.distance() + ddist,
                )
            }
            planet => {
                let heliocentric = elements(planet, d)?.position()?;
                let (dlon, dlat) = giant_perturbations(planet, d);
                let heliocentric = Vector3::from_spherical(
                    heliocentric.longitude() + dlon,
                    heliocentric.latitude() + dlat,
                    heliocentric.distance(),
                );
                heliocentric.add(self.sun_vector(d)?)
            }
        };

        let (mut right_ascension, mut declination) = ecliptic.to_equatorial(eps);
        let (mut longitude, mut latitude) = (ecliptic.longitude(), ecliptic.latitude());

        if let (CelestialBody::Moon, Some(observer)) = (body, observer) {
            (right_ascension, declination) = lunar_parallax(
                right_ascension,
                declination,
                ecliptic.distance(),
                julian_day,
                observer,
            );
            (longitude, latitude) = equatorial_to_ecliptic(right_ascension, declination, eps);
        }

        Ok(CelestialCoordinates {
            longitude,
            latitude,
            distance: ecliptic.distance(),
            right_ascension,
            declination,
            speed_longitude: 0.0,
        })
    }

    /// Geocentric position of the Sun in AU.
    fn sun_vector(&self, d: f64) -> Result<Vector3> {
        elements(CelestialBody::Sun, d)?.position()
    }

    /// Ecliptic longitude of the eastern horizon (tropical).
    pub fn calculate_ascendant(&self, julian_day: JulianDay, location: &Location) -> f64 {
        let ramc = local_sidereal_time(julian_day, location.longitude).to_radians();
        let eps = obliquity(julian_day).to_radians();
        let lat = location.latitude.to_radians();
        let ascendant = ramc
            .cos()
            .atan2(-(ramc.sin() * eps.cos() + lat.tan() * eps.sin()));
        normalize_longitude(ascendant.to_degrees())
    }

    pub fn calculate_planet_positions(
        &self,
        birth_info: &BirthInfo,
        settings: &ChartSettings,
    ) -> Result<Vec<PlanetPosition>> {
        let julian_day = birth_info.julian_day();
        let ayanamsa = AyanamsaInfo::calculate(julian_day).ayanamsa_value;

        settings
            .bodies()
            .into_iter()
            .map(|planet| {
                let coordinates = self.calculate(
                    planet,
                    julian_day,
                    Some(&birth_info.location),
                    settings.topocentric,
                )?;
                let raw = match settings.reference {
                    Reference::Ecliptic => coordinates.longitude,
                    Reference::RightAscension => coordinates.right_ascension,
                };
                let shifted = match settings.zodiac {
                    Zodiac::Tropical => raw,
                    Zodiac::Sidereal => raw - ayanamsa,
                };
                let position = SignPosition::from_longitude(shifted)?;
                Ok(PlanetPosition {
                    planet,
                    longitude: position.longitude,
                    sign: position.sign,
                    degree: position.degree,
                    nakshatra: NakshatraInfo::from_longitude(position.longitude),
                    speed: coordinates.speed_longitude,
                    retrograde: planet.can_retrograde() && coordinates.speed_longitude < 0.0,
                })
            })
            .collect()
    }

    pub fn calculate_chart(
        &self,
        birth_info: &BirthInfo,
        settings: ChartSettings,
    ) -> Result<ChartInfo> {
        let julian_day = birth_info.julian_day();
        let ayanamsa = AyanamsaInfo::calculate(julian_day);

        let mut ascendant = self.calculate_ascendant(julian_day, &birth_info.location);
        if settings.zodiac == Zodiac::Sidereal {
            ascendant -= ayanamsa.ayanamsa_value;
        }
        let ascendant = SignPosition::from_longitude(ascendant)?;

        let planets = self.calculate_planet_positions(birth_info, &settings)?;
        debug!(
            date_time = %birth_info.date_time,
            julian_day,
            ascendant = %ascendant.sign,
            planets = planets.len(),
            "chart calculated"
        );

        Ok(ChartInfo {
            birth_info: birth_info.clone(),
            settings,
            ayanamsa,
            ascendant,
            planets,
        })
    }
}

fn elements(body: CelestialBody, d: f64) -> Result<OrbitalElements> {
    OrbitalElements::for_body(body, d).ok_or_else(|| {
        AstrologyError::Calculation(format!("{} has no orbital elements", body.name()))
    })
}

pub fn calculate_chart(birth_info: &BirthInfo, settings: ChartSettings) -> Result<ChartInfo> {
    Ephemeris::new().calculate_chart(birth_info, settings)
}
