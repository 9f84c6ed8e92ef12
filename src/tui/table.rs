/// Row selection and scrolling for the incidents table
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl TableState {
    /// Start over after the page was replaced
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self) {
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    /// Selected row, if it still exists in a page of `total` rows
    pub fn selected_within(&self, total: usize) -> Option<usize> {
        self.selected.filter(|&i| i < total)
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolls_to_keep_selection_visible() {
        let mut table = TableState {
            visible_rows: 5,
            ..Default::default()
        };
        table.reset(20);
        for _ in 0..7 {
            table.select_next(20);
        }
        assert_eq!(table.selected, Some(7));
        assert_eq!(table.scroll_offset, 3);

        table.select_first();
        assert_eq!(table.scroll_offset, 0);

        table.select_last(20);
        assert_eq!(table.selected, Some(19));
        assert_eq!(table.scroll_offset, 15);
    }

    #[test]
    fn empty_page_has_no_selection() {
        let mut table = TableState::default();
        table.reset(0);
        assert_eq!(table.selected, None);
        table.select_next(0);
        assert_eq!(table.selected, None);
        assert_eq!(table.selected_within(0), None);
    }

    #[test]
    fn selection_outside_shorter_page_is_ignored() {
        let mut table = TableState::default();
        table.select_last(20);
        assert_eq!(table.selected_within(3), None);
        assert_eq!(table.selected_within(20), Some(19));
    }
}
