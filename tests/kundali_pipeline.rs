use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use kundali::chart::{self, HouseBasis, Layout};
use kundali::cities::Gazetteer;
use kundali::config::Config;
use kundali::render::{self, Format, RenderOptions};
use kundali::{
    calculate_chart, BirthInfo, CelestialBody, ChartSettings, Reference, ZodiacSign, Zodiac,
};

fn new_york_noon() -> BirthInfo {
    let location = Gazetteer::builtin().lookup("USA", "New York").unwrap();
    BirthInfo::new(Utc.with_ymd_and_hms(2024, 7, 14, 12, 0, 0).unwrap(), location)
}

#[test]
fn city_to_diagram() {
    let birth = new_york_noon();
    let chart = calculate_chart(&birth, ChartSettings::default()).unwrap();

    assert_eq!(chart.planets.len(), 7);
    // Signs are read from right ascension unless asked otherwise.
    let sun = chart.planet(CelestialBody::Sun).unwrap();
    assert_eq!(sun.sign, ZodiacSign::Cancer);
    assert_abs_diff_eq!(sun.degree, 24.34, epsilon = 0.1);

    for planet in &chart.planets {
        assert!((0.0..360.0).contains(&planet.longitude));
        assert!((0.0..30.0).contains(&planet.degree));
        assert_eq!(planet.sign, ZodiacSign::from_longitude(planet.longitude));
    }

    // With the sign basis a planet sits in the cell numbered after its sign.
    let placement = chart::place(&chart, Layout::Diamond, HouseBasis::Sign);
    for placed in &placement.cells {
        for label in &placed.labels {
            assert!(placed.cell.contains(label.position) || placed.labels.len() > 1);
            let name = label.text.split_whitespace().next().unwrap();
            let planet = chart
                .planets
                .iter()
                .find(|p| p.planet.name() == name)
                .unwrap();
            assert_eq!(planet.sign.number(), placed.cell.house.number());
        }
    }

    let svg = render::render(&chart, Format::Svg, &RenderOptions::default()).unwrap();
    assert!(svg.contains("Sun 24."));
}

#[test]
fn sidereal_table_with_nodes() {
    let birth = new_york_noon();
    let settings = ChartSettings {
        zodiac: Zodiac::Sidereal,
        reference: Reference::Ecliptic,
        include_nodes: true,
        ..ChartSettings::default()
    };
    let chart = birth.generate_chart(settings).unwrap();
    assert_eq!(chart.planets.len(), 9);

    let rahu = chart.planet(CelestialBody::Rahu).unwrap();
    let ketu = chart.planet(CelestialBody::Ketu).unwrap();
    assert_abs_diff_eq!(
        (ketu.longitude - rahu.longitude).rem_euclid(360.0),
        180.0,
        epsilon = 1e-9
    );

    let table = render::render(&chart, Format::Table, &RenderOptions::default()).unwrap();
    assert!(table.contains("Lahiri"));
    assert!(table.contains("Rahu"));
    // The tropical Sun at Cancer 22.5° falls back into Gemini.
    let sun_row = table.lines().find(|l| l.starts_with("Sun")).unwrap();
    assert!(sun_row.contains("Gemini"));
}

#[test]
fn right_ascension_differs_from_longitude() {
    let birth = new_york_noon();
    let equatorial = birth.generate_chart(ChartSettings::default()).unwrap();
    let ecliptic = birth
        .generate_chart(ChartSettings {
            reference: Reference::Ecliptic,
            ..ChartSettings::default()
        })
        .unwrap();

    let a = ecliptic.planet(CelestialBody::Sun).unwrap().longitude;
    let b = equatorial.planet(CelestialBody::Sun).unwrap().longitude;
    // Near the solstice the two coordinates differ by about a degree.
    assert!((a - b).abs() > 0.2 && (a - b).abs() < 3.0, "{a} {b}");
}

#[test]
fn config_drives_the_pipeline() {
    let config = Config::from_toml_str(
        r#"
        country = "India"
        city = "Pune"
        format = "json"
        layout = "wheel"
        nodes = true

        [[cities]]
        country = "India"
        name = "Pune"
        latitude = 18.5204
        longitude = 73.8567
        "#,
    )
    .unwrap();

    let gazetteer = config.gazetteer().unwrap();
    let location = gazetteer
        .lookup(config.country.as_deref().unwrap(), config.city.as_deref().unwrap())
        .unwrap();
    let birth = BirthInfo::new(Utc.with_ymd_and_hms(2001, 1, 1, 6, 30, 0).unwrap(), location);
    let chart = birth.generate_chart(config.settings()).unwrap();

    let json = render::render(&chart, config.format, &RenderOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["planets"].as_array().unwrap().len(), 9);
    assert_abs_diff_eq!(
        value["birth_info"]["location"]["latitude"].as_f64().unwrap(),
        18.5204
    );
}
