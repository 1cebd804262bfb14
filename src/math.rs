use nalgebra::{Matrix3, Matrix4, Rotation3};

use crate::cube::Axis;
use crate::rotation::Direction;

/// Exact integer matrix of a quarter turn about `axis`.
///
/// Clockwise is judged looking from the positive end of the axis, which is a
/// right-hand rotation of -90° about the positive axis:
/// Z maps `(x, y, z)` to `(y, -x, z)`, Y to `(-z, y, x)`, X to `(x, z, -y)`.
pub(crate) fn quarter_turn(axis: Axis, direction: Direction) -> Matrix3<i32> {
    // sin(-d * 90°) = -d, cos = 0
    let d = direction.sign();
    match axis {
        Axis::X => Matrix3::new(
            1, 0, 0,
            0, 0, d,
            0, -d, 0,
        ),
        Axis::Y => Matrix3::new(
            0, 0, -d,
            0, 1, 0,
            d, 0, 0,
        ),
        Axis::Z => Matrix3::new(
            0, d, 0,
            -d, 0, 0,
            0, 0, 1,
        ),
    }
}

/// Homogeneous rotation of a slice that has turned `angle` radians of its
/// quarter turn so far.
pub(crate) fn partial_turn(axis: Axis, direction: Direction, angle: f32) -> Matrix4<f32> {
    let signed = -(direction.sign() as f32) * angle;
    Rotation3::from_axis_angle(&axis.unit(), signed).to_homogeneous()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn quarter_turns_match_coordinate_rules() {
        let p = nalgebra::Vector3::new(1, 2, 3);
        let cw = |axis| quarter_turn(axis, Direction::Clockwise) * p;
        assert_eq!(cw(Axis::Z), nalgebra::Vector3::new(2, -1, 3));
        assert_eq!(cw(Axis::Y), nalgebra::Vector3::new(-3, 2, 1));
        assert_eq!(cw(Axis::X), nalgebra::Vector3::new(1, 3, -2));
    }

    #[test]
    fn opposite_directions_cancel() {
        for axis in Axis::ALL {
            let product = quarter_turn(axis, Direction::Clockwise)
                * quarter_turn(axis, Direction::CounterClockwise);
            assert_eq!(product, Matrix3::identity());
        }
    }

    #[test]
    fn full_partial_turn_agrees_with_quarter_turn() {
        for axis in Axis::ALL {
            for direction in [Direction::Clockwise, Direction::CounterClockwise] {
                let exact = quarter_turn(axis, direction).map(|v| v as f32);
                let animated = partial_turn(axis, direction, FRAC_PI_2);
                let point = Vector4::new(2.0, -1.0, 3.0, 1.0);
                let expected = exact * point.xyz();
                let actual = animated * point;
                assert!((actual.xyz() - expected).norm() < 1e-5);
            }
        }
    }

    #[test]
    fn zero_partial_turn_is_identity() {
        assert_eq!(
            partial_turn(Axis::Y, Direction::Clockwise, 0.0),
            Matrix4::identity()
        );
    }
}
