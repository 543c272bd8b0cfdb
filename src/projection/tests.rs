// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use indoc::indoc;

use super::*;
use crate::{
    constellations::{ConstellationNames, GeometrySource},
    provider::IdentityProvider,
};

/// With [`IdentityProvider`] at this instant, altitude is declination and
/// azimuth is right ascension.
fn j2000() -> Epoch {
    Epoch::from_gregorian_utc_hms(2000, 1, 1, 12, 0, 0)
}

fn observer() -> Observer {
    Observer::new(53.8, 20.5099, 0.0).unwrap()
}

fn star(ra_deg: f64, dec_deg: f64, magnitude: f64) -> CatalogStar {
    CatalogStar {
        hip: 1,
        ra_hours: ra_deg / 15.0,
        dec_deg,
        magnitude,
        pm_ra_mas_per_year: 0.0,
        pm_dec_mas_per_year: 0.0,
    }
}

struct FixedGeometry;

impl GeometrySource for FixedGeometry {
    // Lyr: both ends up. Ori: one end below the horizon. Cru: both down.
    fn lines_json(&self) -> Result<String, ConstellationError> {
        Ok(indoc! {r#"
            {"type":"FeatureCollection","features":[
              {"type":"Feature","id":"Lyr","geometry":{"type":"MultiLineString","coordinates":[[[10.0,40.0],[20.0,45.0]]]}},
              {"type":"Feature","id":"Ori","geometry":{"type":"MultiLineString","coordinates":[[[30.0,5.0],[31.0,-5.0]]]}},
              {"type":"Feature","id":"Cru","geometry":{"type":"MultiLineString","coordinates":[[[50.0,-60.0],[51.0,-62.0]]]}}
            ]}
        "#}
        .to_string())
    }

    // UMi is within the offset of the zenith; Xyz is unknown.
    fn names_json(&self) -> Result<String, ConstellationError> {
        Ok(indoc! {r#"
            {"type":"FeatureCollection","features":[
              {"type":"Feature","id":"Lyr","geometry":{"type":"Point","coordinates":[15.0,42.0]}},
              {"type":"Feature","id":"UMi","geometry":{"type":"Point","coordinates":[0.0,88.5]}},
              {"type":"Feature","id":"Xyz","geometry":{"type":"Point","coordinates":[-90.0,10.0]}},
              {"type":"Feature","id":"Cru","geometry":{"type":"Point","coordinates":[50.0,-60.0]}}
            ]}
        "#}
        .to_string())
    }
}

#[test]
fn test_zenith_distance() {
    assert_abs_diff_eq!(zenith_distance(90.0).unwrap(), 0.0);
    assert_abs_diff_eq!(zenith_distance(30.0).unwrap(), 60.0);
    assert_abs_diff_eq!(zenith_distance(1e-9).unwrap(), 90.0, epsilon = 1e-8);
    assert!(zenith_distance(0.0).is_none());
    assert!(zenith_distance(-12.0).is_none());
    assert!(zenith_distance(f64::NAN).is_none());

    // Strictly decreasing with altitude.
    let radii: Vec<f64> = (1..=90)
        .map(|alt| zenith_distance(alt as f64).unwrap())
        .collect();
    assert!(radii.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_stars_below_the_horizon_are_dropped() {
    let view = IdentityProvider.observe_at(j2000(), &observer());
    assert!(project_star(view.as_ref(), &star(10.0, -0.5, 1.0), 10.0).is_none());
    assert!(project_star(view.as_ref(), &star(10.0, 0.0, 1.0), 10.0).is_none());

    let p = project_star(view.as_ref(), &star(90.0, 25.0, 1.0), 10.0).unwrap();
    assert_abs_diff_eq!(p.radius_deg, 65.0, epsilon = 1e-10);
    assert_abs_diff_eq!(p.theta_rad, 90.0_f64.to_radians(), epsilon = 1e-8);
    assert_eq!(p.magnitude, Some(1.0));
}

#[test]
fn test_magnitude_limit() {
    let view = IdentityProvider.observe_at(j2000(), &observer());
    assert!(project_star(view.as_ref(), &star(10.0, 50.0, 6.0), 6.0).is_some());
    assert!(project_star(view.as_ref(), &star(10.0, 50.0, 6.01), 6.0).is_none());
    // Points have no magnitude, so no limit applies.
    let p = project_point(view.as_ref(), RADec::from_degrees(10.0, 50.0)).unwrap();
    assert!(p.magnitude.is_none());
}

#[test]
fn test_segments_need_both_ends() {
    let view = IdentityProvider.observe_at(j2000(), &observer());
    let up = RADec::from_degrees(10.0, 40.0);
    let also_up = RADec::from_degrees(20.0, 45.0);
    let down = RADec::from_degrees(30.0, -5.0);

    let (a, b) = project_segment(view.as_ref(), up, also_up).unwrap();
    assert_abs_diff_eq!(a.radius_deg, 50.0, epsilon = 1e-10);
    assert_abs_diff_eq!(b.radius_deg, 45.0, epsilon = 1e-10);
    assert!(project_segment(view.as_ref(), up, down).is_none());
    assert!(project_segment(view.as_ref(), down, up).is_none());
}

#[test]
fn test_label_radius_is_floored() {
    let view = IdentityProvider.observe_at(j2000(), &observer());
    let p = project_label(view.as_ref(), RADec::from_degrees(0.0, 40.0), 3.0).unwrap();
    assert_abs_diff_eq!(p.radius_deg, 47.0, epsilon = 1e-10);

    let p = project_label(view.as_ref(), RADec::from_degrees(0.0, 88.5), 3.0).unwrap();
    assert_abs_diff_eq!(p.radius_deg, 0.0);

    assert!(project_label(view.as_ref(), RADec::from_degrees(0.0, -1.0), 3.0).is_none());
}

#[test]
fn test_scene_without_constellations() {
    let stars = [
        star(0.0, 10.0, 1.0),
        star(0.0, -10.0, 1.0),
        star(0.0, 20.0, 11.0),
        star(0.0, 30.0, 9.9),
    ];
    let scene = project_scene(
        &IdentityProvider,
        j2000(),
        &observer(),
        &stars,
        None,
        &ProjectionSettings::default(),
    )
    .unwrap();
    assert_eq!(scene.stars.len(), 2);
    assert!(scene.segments.is_empty());
    assert!(scene.labels.is_empty());
    assert!(!scene.has_constellations);
    assert_eq!(scene.epoch, j2000());
}

#[test]
fn test_scene_with_constellations() {
    let cache = ConstellationCache::new(Box::new(FixedGeometry), ConstellationNames::Common);
    let scene = project_scene(
        &IdentityProvider,
        j2000(),
        &observer(),
        &[star(0.0, 10.0, 1.0)],
        Some(&cache),
        &ProjectionSettings::default(),
    )
    .unwrap();
    assert!(scene.has_constellations);

    // Only Lyr's segment has both ends up.
    assert_eq!(scene.segments.len(), 1);
    assert_abs_diff_eq!(scene.segments[0].0.radius_deg, 50.0, epsilon = 1e-10);

    let texts: Vec<&str> = scene.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, ["Lyra", "Ursa Minor", "Xyz"]);
    assert_abs_diff_eq!(scene.labels[0].point.radius_deg, 45.0, epsilon = 1e-10);
    assert_abs_diff_eq!(scene.labels[1].point.radius_deg, 0.0);
    assert!(scene.labels.iter().all(|l| l.point.radius_deg >= 0.0));
}

#[test]
fn test_scenes_change_with_time() {
    let stars = [star(0.0, 45.0, 1.0)];
    let settings = ProjectionSettings::default();
    let a = project_scene(&IdentityProvider, j2000(), &observer(), &stars, None, &settings).unwrap();
    let later = j2000() + hifitime::Duration::from_seconds(3600.0);
    let b = project_scene(&IdentityProvider, later, &observer(), &stars, None, &settings).unwrap();
    assert_abs_diff_eq!(a.stars[0].radius_deg, b.stars[0].radius_deg);
    assert!((a.stars[0].theta_rad - b.stars[0].theta_rad).abs() > 0.1);
}

/// Bright stars around Lyra, plus some that are down on a June night in
/// Olsztyn, in the `hip_main.dat` layout.
const HIP_MAIN: &str = indoc! {"
    H|       91262| |18 36 56.19|+38 46 58.8| 0.03| |H|279.23410832|+38.78299311| |  128.93|  201.02|  287.46|  0.55|  0.54
    H|       91971| |18 44 46.36|+37 36 18.4| 4.34| |H|281.19324826|+37.60510792| |   21.14|   19.24|   24.86|  0.57|  0.57
    H|       92420| |18 50 04.79|+33 21 45.6| 3.52| |H|282.51997830|+33.36266658| |    3.70|    1.10|   -4.46|  0.53|  0.64
    H|       93194| |18 58 56.62|+32 41 22.4| 3.25| |H|284.73592666|+32.68955736| |    5.35|   -2.76|    1.77|  0.48|  0.55
    H|       11767| |02 31 47.08|+89 15 50.9| 1.97| |H|037.94614689|+89.26413805| |    7.56|   44.22|  -11.74|  0.39|  0.45
    H|       69673| |14 15 40.35|+19 11 14.2|-0.05| |H|213.91811403|+19.18726997| |   88.85|-1093.45|-1999.40|  0.63|  0.50
    H|       32349| |06 45 08.92|-16 42 58.0|-1.44| |H|101.28715539|-16.71611582| |  379.21| -546.01|-1223.08|  0.51|  0.40
    H|       33579| |06 58 37.55|-28 58 19.5| 1.50| |H|104.65644451|-28.97208931| |    7.57|    2.63|    2.29|  0.41|  0.57
    H|       27989| |05 55 10.29|+07 24 25.3| 0.45| |H|088.79287161|+07.40703634| |    7.63|   27.33|   10.86|  1.04|  0.56
    H|       24436| |05 14 32.27|-08 12 05.9| 0.18| |H|078.63446353|-08.20163919| |    4.22|    1.87|   -0.56|  0.67|  0.46
    H|      999999| |18 37 00.00|+38 00 00.0|11.20| |H|279.25000000|+38.00000000| |    1.00|    0.00|    0.00|  1.00|  1.00
"};

/// The Lyra figure, Orion's belt-to-foot and Canis Major's Sirius-Adhara.
struct ReferenceGeometry;

impl GeometrySource for ReferenceGeometry {
    fn lines_json(&self) -> Result<String, ConstellationError> {
        Ok(indoc! {r#"
            {"type":"FeatureCollection","features":[
              {"type":"Feature","id":"Lyr","geometry":{"type":"MultiLineString","coordinates":[[[-80.7659,38.7830],[-78.8068,37.6051],[-77.4800,33.3627],[-75.2641,32.6896]]]}},
              {"type":"Feature","id":"Ori","geometry":{"type":"MultiLineString","coordinates":[[[88.7929,7.4071],[78.6345,-8.2016]]]}},
              {"type":"Feature","id":"CMa","geometry":{"type":"MultiLineString","coordinates":[[[101.2872,-16.7161],[104.6564,-28.9721]]]}}
            ]}
        "#}
        .to_string())
    }

    fn names_json(&self) -> Result<String, ConstellationError> {
        Ok(indoc! {r#"
            {"type":"FeatureCollection","features":[
              {"type":"Feature","id":"Lyr","geometry":{"type":"Point","coordinates":[-78.0,36.0]}},
              {"type":"Feature","id":"CMa","geometry":{"type":"Point","coordinates":[103.0,-22.0]}}
            ]}
        "#}
        .to_string())
    }
}

#[test]
fn test_june_night_over_olsztyn() {
    use hifitime::Duration;

    use crate::{catalog::read_hipparcos, provider::ErfaProvider};

    let stars = read_hipparcos(HIP_MAIN.as_bytes()).unwrap();
    assert_eq!(stars.len(), 11);
    let cache = ConstellationCache::new(Box::new(ReferenceGeometry), ConstellationNames::Latin);
    let provider = ErfaProvider::load_ephemeris(Duration::from_seconds(0.0)).unwrap();
    let epoch = Epoch::from_gregorian_utc_hms(2024, 6, 4, 22, 0, 0);
    let settings = ProjectionSettings {
        magnitude_limit: 10.0,
        ..Default::default()
    };

    let scene = project_scene(
        &provider,
        epoch,
        &observer(),
        &stars,
        Some(&cache),
        &settings,
    )
    .unwrap();
    assert!(scene.has_constellations);

    // The four Lyra stars, Polaris and Arcturus are up. Sirius, Adhara,
    // Betelgeuse and Rigel are down, and the 11th-magnitude star is too dim.
    assert_eq!(scene.stars.len(), 6);
    let mut magnitudes: Vec<f64> = scene.stars.iter().filter_map(|p| p.magnitude).collect();
    magnitudes.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(magnitudes, [-0.05, 0.03, 1.97, 3.25, 3.52, 4.34]);

    // Vega is about 28° from the zenith, in the east-south-east.
    let vega = scene
        .stars
        .iter()
        .find(|p| p.magnitude == Some(0.03))
        .unwrap();
    assert_abs_diff_eq!(vega.radius_deg, 90.0 - 62.0, epsilon = 0.5);
    assert_abs_diff_eq!(vega.theta_rad.to_degrees(), 108.1, epsilon = 0.5);

    // Only the Lyra chain is up.
    assert_eq!(scene.segments.len(), 3);
    assert!(scene
        .segments
        .iter()
        .all(|(a, b)| a.radius_deg < 40.0 && b.radius_deg < 40.0));
    assert_eq!(scene.labels.len(), 1);
    assert_eq!(scene.labels[0].text, "Lyra");
}
