use chrono::{Datelike, Duration, Timelike};
use sdp4::{
    ElementSet, GravityModel, ModelSelection, Propagator, PropagatorOptions, Sdp4Error, Theory,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SDP4_JSON: &str = r#"{
    "ndot": 0.01431103,
    "nddot": 0.0,
    "bstar": 0.014311,
    "inclination_deg": 46.7916,
    "raan_deg": 230.4354,
    "eccentricity_e7": 7318036,
    "arg_perigee_deg": 47.4722,
    "mean_anomaly_deg": 10.4117,
    "mean_motion": 2.28537848,
    "epoch": 80230.29629788
}"#;

fn sdp4_case() -> ElementSet {
    serde_json::from_str(SDP4_JSON).unwrap()
}

/// Perigee around 35 km with a heavy drag term.
fn reentering() -> ElementSet {
    ElementSet {
        ndot: 0.0001,
        nddot: 0.0,
        bstar: 5.0e-4,
        inclination_deg: 51.6,
        raan_deg: 10.0,
        eccentricity_e7: 200_000,
        arg_perigee_deg: 90.0,
        mean_anomaly_deg: 180.0,
        mean_motion: 16.4,
        epoch: 6177.0,
    }
}

#[test]
fn element_set_from_json() {
    init_logging();
    let el = sdp4_case();
    assert_eq!(el.eccentricity_e7, 7318036);
    assert!((el.eccentricity() - 0.7318036).abs() < 1e-12);

    let mut sat = Propagator::from_elements(&el).unwrap();
    let r = sat.propagate(0.0).unwrap();
    assert!((r.position[0] - 7473.37066650).abs() < 0.05);

    let out = serde_json::to_value(&r).unwrap();
    assert_eq!(out["tsince"], 0.0);
    assert_eq!(out["position"].as_array().unwrap().len(), 3);
    assert!(out["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn options_from_json() {
    let opts: PropagatorOptions =
        serde_json::from_str(r#"{"gravity":"wgs84","model":"deep_space"}"#).unwrap();
    assert_eq!(opts.gravity, GravityModel::Wgs84);
    assert_eq!(opts.model, ModelSelection::DeepSpace);

    let defaults: PropagatorOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, PropagatorOptions::default());
    assert_eq!(defaults.gravity, GravityModel::Wgs72Old);
    assert_eq!(defaults.model, ModelSelection::Auto);

    assert!(serde_json::from_str::<PropagatorOptions>(r#"{"gravity":"egm96"}"#).is_err());
}

#[test]
fn gravity_model_names() {
    assert_eq!("WGS84".parse::<GravityModel>().unwrap(), GravityModel::Wgs84);
    assert_eq!(GravityModel::Wgs72Old.to_string(), "wgs72old");
    assert!(matches!(
        "egm96".parse::<GravityModel>(),
        Err(Sdp4Error::UnknownGravityModel(_))
    ));
}

#[test]
fn other_gravity_models_shift_the_answer_slightly() {
    let el = sdp4_case();
    let mut old = Propagator::from_elements(&el).unwrap();
    let mut wgs84 = Propagator::new(
        &el,
        PropagatorOptions {
            gravity: GravityModel::Wgs84,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(wgs84.theory(), Theory::DeepSpace);
    let a = old.propagate(360.0).unwrap().position;
    let b = wgs84.propagate(360.0).unwrap().position;
    let d = (0..3).map(|i| (a[i] - b[i]).powi(2)).sum::<f64>().sqrt();
    assert!(d > 0.0 && d < 10.0, "{d} km");
}

#[test]
fn epoch_accessors() {
    let sat = Propagator::from_elements(&sdp4_case()).unwrap();
    assert_eq!(sat.epoch().year(), 1980);
    assert!((sat.epoch().day_of_year() - 230.29629788).abs() < 1e-9);
    assert!((sat.epoch_days_since_1950() - 11187.29629788).abs() < 1e-7);
    assert!((sat.epoch_jd() - 2444468.79629788).abs() < 1e-7);

    let dt = sat.epoch_datetime().unwrap();
    assert_eq!((dt.year(), dt.month(), dt.day()), (1980, 8, 17));
    assert_eq!((dt.hour(), dt.minute(), dt.second()), (7, 6, 40));
}

#[test]
fn datetime_query_matches_minutes() {
    let mut sat = Propagator::from_elements(&sdp4_case()).unwrap();
    let when = sat.epoch_datetime().unwrap() + Duration::days(1);
    let by_time = sat.propagate_datetime(&when).unwrap();
    let by_min = sat.propagate(1440.0).unwrap();
    assert!((by_time.tsince - 1440.0).abs() < 1e-6);
    for i in 0..3 {
        assert!((by_time.position[i] - by_min.position[i]).abs() < 1e-3);
    }
}

#[test]
fn batch_keeps_going_after_a_bad_time() {
    let mut sat = Propagator::from_elements(&sdp4_case()).unwrap();
    let out = sat.propagate_many(&[0.0, f64::NAN, 720.0]);
    assert!(out[0].is_ok());
    assert!(matches!(out[1], Err(Sdp4Error::InvalidElements(_))));
    let r = out[2].as_ref().unwrap();
    assert!((r.position[0] - 14271.28759766).abs() < 0.05);
}

#[test]
fn invalid_element_sets_are_rejected() {
    let base = sdp4_case();
    let cases = [
        ElementSet {
            eccentricity_e7: 10_000_000,
            ..base
        },
        ElementSet {
            mean_motion: 0.0,
            ..base
        },
        ElementSet {
            inclination_deg: 190.0,
            ..base
        },
        ElementSet {
            bstar: f64::NAN,
            ..base
        },
        ElementSet {
            epoch: 80400.5,
            ..base
        },
    ];
    for el in cases {
        assert!(
            matches!(Propagator::from_elements(&el), Err(Sdp4Error::InvalidElements(_))),
            "{el:?}"
        );
    }
}

#[test]
fn low_perigee_uses_density_floor_and_decays() {
    init_logging();
    let mut sat = Propagator::from_elements(&reentering()).unwrap();
    assert_eq!(sat.theory(), Theory::NearEarth);
    assert!(sat.perigee_floor_clamped());
    assert!(sat.secular().simplified_drag);

    // at apogee on the epoch the orbit is still above ground
    let r = sat.propagate(0.0).unwrap();
    let radius = r.position.iter().map(|x| x * x).sum::<f64>().sqrt();
    assert!(radius > 6378.135, "{radius}");

    match sat.propagate(10.0) {
        Err(Sdp4Error::DecayedOrbit { height_km }) => assert!(height_km < 0.0),
        other => panic!("expected decay, got {other:?}"),
    }
}

#[test]
fn ordinary_orbit_is_not_clamped() {
    let sat = Propagator::from_elements(&sdp4_case()).unwrap();
    assert!(!sat.perigee_floor_clamped());
}
