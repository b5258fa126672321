//! Order in which the sections of a chunk are visited.

/// A permutation of section indices `0..height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionOrder {
    order: Vec<usize>,
}

impl SectionOrder {
    /// Sections sorted by distance from the player's section `player_y >> 4`.
    ///
    /// Ties go to the lower section. The player's section may lie outside
    /// the world; the order is still well defined.
    ///
    /// # Example
    /// ```
    /// use voxel_scanner::scanner::SectionOrder;
    ///
    /// let order = SectionOrder::nearest_to(64, 8);
    /// assert_eq!(order.as_slice(), &[4, 3, 5, 2, 6, 1, 7, 0]);
    /// ```
    pub fn nearest_to(player_y: i32, height_in_sections: usize) -> Self {
        let player_section = i64::from(player_y >> 4);
        let mut order: Vec<usize> = (0..height_in_sections).collect();
        // Stable sort keeps ascending index order among equal distances.
        order.sort_by_key(|&section| (section as i64 - player_section).abs());
        SectionOrder { order }
    }

    /// Sections bottom to top.
    pub fn natural(height_in_sections: usize) -> Self {
        SectionOrder {
            order: (0..height_in_sections).collect(),
        }
    }

    /// Number of sections covered.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the order covers no section.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The section indices in visiting order.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }
}
