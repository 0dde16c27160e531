use super::types::Point;

/// Accepts only axis-aligned unit headings.
pub fn parse_direction(value: Point) -> Option<Point> {
    if value.x.abs() + value.y.abs() != 1 {
        return None;
    }
    Some(value)
}
