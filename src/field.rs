use crate::simulation::Board;

/// Dense visual field produced from the sparse board state. Each logical
/// cell maps to a `scale x scale` block of samples; a presentation
/// transform only, never part of simulation state.
pub struct DisplayField {
    samples: Vec<f32>,
    width: usize,
    height: usize,
    scale: usize,
    grid_lines: bool,
}

impl DisplayField {
    pub fn new(board_width: usize, board_height: usize, scale: usize, grid_lines: bool) -> Self {
        Self {
            samples: vec![0.0; board_width * scale * board_height * scale],
            width: board_width * scale,
            height: board_height * scale,
            scale,
            grid_lines,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Expand the board interior into the field, remapping each value
    /// through `(v + 1) / 2` so dead cells render mid-grey and fade trails
    /// stay visible. Every sample is written on every call; when gridlines
    /// are enabled the outermost sample ring of each block is set to 0
    /// instead of the cell value, so downstream consumers (mipmapping,
    /// texture upload) always see a fully populated field.
    pub fn expand(&mut self, board: &Board) {
        debug_assert_eq!(self.width, board.width() * self.scale);
        debug_assert_eq!(self.height, board.height() * self.scale);

        let s = self.scale;
        let border = if self.grid_lines && s > 2 { 1 } else { 0 };
        for cy in 0..board.height() {
            for cx in 0..board.width() {
                let shade = (board.get(cx, cy) + 1.0) / 2.0;
                for sy in 0..s {
                    let row = (cy * s + sy) * self.width + cx * s;
                    let on_edge_y = sy < border || sy >= s - border;
                    for sx in 0..s {
                        let on_edge = on_edge_y || sx < border || sx >= s - border;
                        self.samples[row + sx] = if on_edge { 0.0 } else { shade };
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Board;

    #[test]
    fn expand_replicates_blocks_with_remap() {
        let mut board = Board::new(2, 2);
        board.set(0, 0, 1.0);
        board.set(1, 1, 0.5);
        let mut field = DisplayField::new(2, 2, 4, false);
        field.expand(&board);

        for sy in 0..4 {
            for sx in 0..4 {
                // (1.0 + 1) / 2
                assert_eq!(field.samples()[sy * 8 + sx], 1.0);
                // (0.0 + 1) / 2
                assert_eq!(field.samples()[sy * 8 + 4 + sx], 0.5);
                // (0.5 + 1) / 2
                assert_eq!(field.samples()[(4 + sy) * 8 + 4 + sx], 0.75);
            }
        }
    }

    #[test]
    fn gridlines_keep_field_fully_populated() {
        let mut board = Board::new(3, 1);
        board.set(1, 0, 1.0);
        let mut field = DisplayField::new(3, 1, 4, true);
        // Poison the field so an unwritten sample is detectable.
        field.samples.fill(f32::NAN);
        field.expand(&board);
        assert!(field.samples().iter().all(|v| v.is_finite()));

        // Center of the live block carries the remapped value, the ring is
        // dark.
        assert_eq!(field.samples()[1 * 12 + 4 + 1], 1.0);
        assert_eq!(field.samples()[0 * 12 + 4], 0.0);
        assert_eq!(field.samples()[3 * 12 + 7], 0.0);
    }

    #[test]
    fn expand_leaves_board_untouched() {
        let mut board = Board::new(4, 4);
        board.set(2, 1, 1.0);
        let before = board.cells().to_vec();
        let mut field = DisplayField::new(4, 4, 8, true);
        field.expand(&board);
        assert_eq!(board.cells(), before.as_slice());
    }
}
