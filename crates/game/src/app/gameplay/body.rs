use engine::Vec2;

use super::direction::Direction;

/// Integer world position in units; one tile is `tile_size` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Point {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Point {
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) const fn offset(self, direction: Direction, distance: i32) -> Self {
        Self {
            x: self.x + direction.delta_x() * distance,
            y: self.y + direction.delta_y() * distance,
        }
    }

    pub(crate) fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BodySegment {
    pub(crate) position: Point,
    pub(crate) previous_position: Point,
    pub(crate) render_position: Vec2,
    pub(crate) direction: Direction,
}

impl BodySegment {
    fn at(position: Point, direction: Direction) -> Self {
        Self {
            position,
            previous_position: position,
            render_position: position.to_vec2(),
            direction,
        }
    }
}

/// Ordered snake segments, head first.
///
/// After every [`SnakeBody::step`] each segment sits on the tile its
/// head-ward neighbour occupied before the step, and render positions restart
/// from the previous tiles. [`SnakeBody::interpolate`] then slides render
/// positions toward the current tiles without touching either tile.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SnakeBody {
    segments: Vec<BodySegment>,
    direction: Direction,
    last_direction: Direction,
    tile_size: i32,
}

impl SnakeBody {
    /// Lays out `segment_count + 1` segments trailing behind `start`.
    pub(crate) fn new(
        start: Point,
        segment_count: usize,
        direction: Direction,
        tile_size: i32,
    ) -> Self {
        let trailing = direction.opposite();
        let segments = (0..=segment_count)
            .map(|index| {
                let position = start.offset(trailing, index as i32 * tile_size);
                BodySegment::at(position, direction)
            })
            .collect();
        Self {
            segments,
            direction,
            last_direction: direction,
            tile_size,
        }
    }

    pub(crate) fn segments(&self) -> &[BodySegment] {
        &self.segments
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn head(&self) -> &BodySegment {
        &self.segments[0]
    }

    pub(crate) fn tail(&self) -> &BodySegment {
        &self.segments[self.segments.len() - 1]
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.last_direction = self.direction;
        self.direction = direction;
    }

    /// True when any segment sits on `point` or is still sliding off it.
    pub(crate) fn occupies(&self, point: Point) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.position == point || segment.previous_position == point)
    }

    /// Commits one tile of movement.
    pub(crate) fn step(&mut self) {
        for index in (1..self.segments.len()).rev() {
            let target = self.segments[index - 1].position;
            let segment = &mut self.segments[index];
            let heading = Direction::from_offset(
                target.x - segment.position.x,
                target.y - segment.position.y,
            );

            segment.previous_position = segment.position;
            segment.position = target;
            // A freshly grown or warped segment has no usable offset; it keeps
            // facing the way it already did.
            if let Some(heading) = heading {
                segment.direction = heading;
            }
        }

        let direction = self.direction;
        let tile_size = self.tile_size;
        let head = &mut self.segments[0];
        head.direction = direction;
        head.previous_position = head.position;
        head.position = head.position.offset(direction, tile_size);

        for segment in &mut self.segments {
            segment.render_position = segment.previous_position.to_vec2();
        }
    }

    pub(crate) fn interpolate(&mut self, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);
        for segment in &mut self.segments {
            segment.render_position = segment
                .previous_position
                .to_vec2()
                .lerp(segment.position.to_vec2(), progress);
        }
    }

    pub(crate) fn collides_with_self(&self) -> bool {
        let head = self.head().position;
        self.segments[1..]
            .iter()
            .any(|segment| segment.position == head)
    }

    /// Appends a segment on top of the tail, so growth is invisible until the
    /// next step separates them.
    pub(crate) fn grow(&mut self) {
        let tail = self.tail().clone();
        self.segments.push(tail);
    }

    /// Teleports every segment to column `x`. Segments are stacked until the
    /// caller keeps stepping and they unspool again.
    pub(crate) fn warp(&mut self, x: i32, direction: Direction) {
        for segment in &mut self.segments {
            segment.position.x = x;
            segment.previous_position.x = x;
            segment.render_position.x = x as f32;
            segment.direction = direction;
        }
        self.set_direction(direction);
    }
}
