//! The synthetic hands measured through the public geometry API.

use approx::assert_relative_eq;
use hand_pose::{
    distance, pointing_angle, synth, Finger, Joint, LandmarkError, LandmarkPoint, LandmarkSample,
    FIST_THRESHOLD, LANDMARK_COUNT,
};

fn raised(hand: &LandmarkSample) -> Vec<Finger> {
    Finger::ALL.into_iter().filter(|f| hand.is_finger_extended(*f)).collect()
}

#[test]
fn stock_poses_raise_the_expected_fingers() {
    assert!(raised(&synth::fist()).is_empty());
    assert_eq!(raised(&synth::open_hand()), Finger::ALL.to_vec());
    assert_eq!(raised(&synth::three_fingers()), vec![Finger::Index, Finger::Middle, Finger::Ring]);
    assert_eq!(raised(&synth::pinch(0.12)), vec![Finger::Thumb, Finger::Index]);
    assert_eq!(raised(&synth::two_fingers(0.02)), vec![Finger::Index, Finger::Middle]);
}

#[test]
fn fist_folds_every_long_finger() {
    let hand = synth::fist();
    for finger in Finger::FOUR {
        assert!(hand.curl(finger).is_folded(FIST_THRESHOLD), "{} not folded", finger.name());
    }
    let open = synth::open_hand();
    assert!(Finger::FOUR.iter().all(|f| !open.curl(*f).is_folded(FIST_THRESHOLD)));
}

#[test]
fn pinch_distance_is_what_was_asked_for() {
    for d in [0.05_f32, 0.10, 0.20] {
        let hand = synth::pinch(d);
        assert_relative_eq!(distance(hand.tip(Finger::Thumb), hand.tip(Finger::Index)), d, epsilon = 1e-4);
    }
}

#[test]
fn pointing_angles_land_in_their_windows() {
    let up = synth::point_up();
    let a = pointing_angle(up[Joint::IndexTip], up[Joint::IndexPip]);
    assert!(a < 30.0 || a > 330.0, "up angle {}", a);

    let down = synth::point_down();
    let a = pointing_angle(down[Joint::IndexTip], down[Joint::IndexPip]);
    assert!(a > 150.0 && a < 210.0, "down angle {}", a);
}

#[test]
fn raw_points_are_validated() {
    let good = synth::open_hand().points().to_vec();
    assert_eq!(LandmarkSample::try_from(good.as_slice()), Ok(synth::open_hand()));

    assert_eq!(
        LandmarkSample::try_from(&good[..LANDMARK_COUNT - 1]),
        Err(LandmarkError::WrongCount { found: 20 })
    );

    let mut bad = good;
    bad[7] = LandmarkPoint::new(f32::INFINITY, 0.5);
    assert_eq!(LandmarkSample::try_from(bad), Err(LandmarkError::NonFinite { index: 7 }));
}
