/// Axis-aligned rectangle in canvas pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    #[cfg(test)]
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Named regions of the stats card.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    Canvas,
    Header,
    AvatarPanel,
    Banner,
    SidePanel,
    Footer,
    RankBadge,
    StatsColumn,
    GuildBlock,
}

/// Placement of one stats section: its title baseline row and its backing panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SectionFrame {
    pub title_y: i32,
    pub panel: Rect,
}

impl SectionFrame {
    /// Vertical centre of row `slot` (1-based, the title sits at slot 0).
    pub fn row_y(&self, slot: usize, step: u32) -> i32 {
        self.title_y + SECTION_TITLE_GAP + (step as i32) * slot as i32
    }
}

const SECTION_TITLE_GAP: i32 = 5;
const SECTION_FIRST_TITLE: i32 = 40;
const SECTION_PANEL_LIFT: i32 = 18;
const SECTION_PANEL_INSET: i32 = 10;
const SECTION_PANEL_TRIM: u32 = 5;

/// Base measurements every widget position is derived from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub header_height: u32,
    pub avatar_width: u32,
    pub avatar_height: u32,
    pub footer_height: u32,
    pub row_step: u32,
}

impl CardLayout {
    pub const STANDARD: CardLayout = CardLayout {
        width: 562,
        height: 952,
        header_height: 102,
        avatar_width: 281,
        avatar_height: 434,
        footer_height: 262,
        row_step: 22,
    };

    /// Height of the column between header and footer.
    fn body_height(&self) -> u32 {
        self.height - self.header_height - self.footer_height
    }

    pub fn rect(&self, widget: Widget) -> Rect {
        let header = self.header_height as i32;
        match widget {
            Widget::Canvas => Rect::new(0, 0, self.width, self.height),
            Widget::Header => Rect::new(0, 0, self.width, self.header_height),
            Widget::AvatarPanel => Rect::new(0, header, self.avatar_width, self.avatar_height),
            Widget::Banner => Rect::new(
                self.avatar_width as i32,
                header,
                self.width - self.avatar_width,
                self.body_height(),
            ),
            Widget::SidePanel => Rect::new(
                0,
                header + self.avatar_height as i32,
                self.avatar_width,
                self.body_height() - self.avatar_height,
            ),
            Widget::Footer => Rect::new(
                0,
                (self.height - self.footer_height) as i32,
                self.width,
                self.footer_height,
            ),
            Widget::RankBadge => {
                let height = self.header_height / 3;
                Rect::new(15, 30 - height as i32 / 2, self.avatar_width - 15, height)
            }
            Widget::StatsColumn => Rect::new(
                self.avatar_width as i32 + 20,
                header,
                self.width - self.avatar_width - 40,
                self.body_height(),
            ),
            Widget::GuildBlock => {
                let side = self.rect(Widget::SidePanel);
                Rect::new(20, side.y, side.width - 40, side.height)
            }
        }
    }

    /// Stacks sections (given as slot counts, gaps included) down the stats column.
    ///
    /// A section with `n` slots gets a panel `(n + 2) * row_step - 5` pixels tall.
    pub fn sections(&self, slot_counts: &[usize]) -> Vec<SectionFrame> {
        let step = self.row_step as i32;
        let mut title_y = self.header_height as i32 + SECTION_FIRST_TITLE;

        slot_counts
            .iter()
            .map(|&slots| {
                let span = (slots as i32 + 2) * step;
                let panel = Rect::new(
                    self.avatar_width as i32 + SECTION_PANEL_INSET,
                    title_y - SECTION_PANEL_LIFT,
                    self.width - self.avatar_width - 2 * SECTION_PANEL_INSET as u32,
                    span as u32 - SECTION_PANEL_TRIM,
                );
                let frame = SectionFrame { title_y, panel };
                title_y += SECTION_TITLE_GAP + span;
                frame
            })
            .collect()
    }

    /// Centre of the raid donut, to the right of the raid rows.
    pub fn raid_pie_center(&self, raid_section: &SectionFrame) -> (f32, f32) {
        ((self.width - 72) as f32, (raid_section.title_y + 83) as f32)
    }

    /// Centre of gauge `index` when `count` gauges share the footer evenly.
    pub fn gauge_center(&self, index: usize, count: usize) -> (f32, f32) {
        let slot = self.width as f32 / count.max(1) as f32;
        let footer = self.rect(Widget::Footer);
        (
            index as f32 * slot + slot / 2.0,
            footer.y as f32 + 120.0,
        )
    }

    pub fn footer_caption(&self) -> (f32, f32) {
        let footer = self.rect(Widget::Footer);
        (self.width as f32 / 2.0, footer.y as f32 + 40.0)
    }
}

impl Default for CardLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}
