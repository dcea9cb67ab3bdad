//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! A voxel box does not fit on a character grid, so it is drawn as two
//! orthographic projections next to each other:
//!
//! - **Plan**: looking down the z axis. Each column shows the colour of its
//!   highest settled layer; the falling piece is overlaid with its height.
//! - **Elevation**: looking at one side face, z going up. Which face is shown
//!   follows the camera hint (or the `v` key).
//!
//! Settled cells are coloured by the layer they sit in.
//!
//! This module is pure (no I/O). It can be unit-tested.

use glam::IVec3;

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CameraHint, CellState};

/// Layer palette, indexed by `z % len`.
pub const LAYER_COLORS: [Rgb; 18] = [
    Rgb::from_hex(0x6666ff),
    Rgb::from_hex(0x66ffff),
    Rgb::from_hex(0xcc68ee),
    Rgb::from_hex(0x666633),
    Rgb::from_hex(0x66ff66),
    Rgb::from_hex(0x9966ff),
    Rgb::from_hex(0x00ff66),
    Rgb::from_hex(0x66ee33),
    Rgb::from_hex(0x003399),
    Rgb::from_hex(0x330099),
    Rgb::from_hex(0xffa500),
    Rgb::from_hex(0x99ff00),
    Rgb::from_hex(0xee1289),
    Rgb::from_hex(0x71c671),
    Rgb::from_hex(0x00bfff),
    Rgb::from_hex(0x666633),
    Rgb::from_hex(0x669966),
    Rgb::from_hex(0x9966ff),
];

pub fn layer_color(z: i32) -> Rgb {
    LAYER_COLORS[z.rem_euclid(LAYER_COLORS.len() as i32) as usize]
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const ACTIVE_FG: Rgb = Rgb::new(255, 255, 255);
const BORDER_FG: Rgb = Rgb::new(200, 200, 200);
const BLOCKED_FG: Rgb = Rgb::new(255, 220, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
}

/// Which side face the elevation projection shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Elevation {
    /// x across, z up (looking along y)
    #[default]
    Xz,
    /// y across, z up (looking along x)
    Yz,
}

impl Elevation {
    pub fn toggled(self) -> Self {
        match self {
            Elevation::Xz => Elevation::Yz,
            Elevation::Yz => Elevation::Xz,
        }
    }

    /// A head moved mostly sideways looks at the y-z face.
    pub fn from_camera(hint: CameraHint) -> Self {
        if hint.x.abs() >= hint.y.abs() {
            Elevation::Yz
        } else {
            Elevation::Xz
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Elevation::Xz => "SIDE XZ",
            Elevation::Yz => "SIDE YZ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen rectangle of one framed projection (border included)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the voxel box.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
    elevation: Elevation,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell compensate for the glyph aspect ratio.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
            elevation: Elevation::default(),
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn elevation(&self) -> Elevation {
        self.elevation
    }

    pub fn set_elevation(&mut self, elevation: Elevation) {
        self.elevation = elevation;
    }

    pub fn cycle_elevation(&mut self) {
        self.elevation = self.elevation.toggled();
    }

    pub fn apply_camera_hint(&mut self, hint: CameraHint) {
        self.elevation = Elevation::from_camera(hint);
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers reuse the framebuffer across frames; it is only resized when the
    /// viewport changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let dims = snap.dims;
        let across = match self.elevation {
            Elevation::Xz => dims.x,
            Elevation::Yz => dims.y,
        };
        let plan_w = span(dims.x, self.cell_w);
        let plan_h = span(dims.y, 1);
        let elev_w = span(across, self.cell_w);
        let elev_h = span(dims.z, 1);

        // One title row above the frames.
        let total_w = plan_w.saturating_add(2).saturating_add(elev_w);
        let total_h = plan_h.max(elev_h).saturating_add(1);
        let start_x = viewport.width.saturating_sub(total_w.saturating_add(14)) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(total_h) / 2,
            AnchorY::Top => 0,
        };

        let plan = Frame {
            x: start_x,
            y: start_y + 1,
            w: plan_w,
            h: plan_h,
        };
        let elev = Frame {
            x: start_x.saturating_add(plan_w).saturating_add(2),
            y: start_y + 1,
            w: elev_w,
            h: elev_h,
        };

        let title = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        fb.put_str(plan.x, start_y, "PLAN", title);
        fb.put_str(elev.x, start_y, self.elevation.label(), title);

        let border = CellStyle {
            fg: if snap.blocked { BLOCKED_FG } else { BORDER_FG },
            bold: snap.blocked,
            ..CellStyle::default()
        };
        for frame in [plan, elev] {
            fb.fill_rect(
                frame.x.saturating_add(1),
                frame.y.saturating_add(1),
                frame.w - 2,
                frame.h - 2,
                ' ',
                self.empty_style(),
            );
            draw_border(fb, frame, border);
        }

        self.draw_plan(fb, snap, plan);
        self.draw_elevation(fb, snap, elev);

        self.draw_side_panel(fb, snap, adapter, viewport, start_x.saturating_add(total_w).saturating_add(2), plan.y);

        if snap.game_over() {
            draw_overlay_text(fb, plan, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, adapter, viewport, &mut fb);
        fb
    }

    fn empty_style(&self) -> CellStyle {
        CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: PLAY_BG,
            bold: false,
            dim: true,
        }
    }

    fn settled_style(z: i32) -> CellStyle {
        CellStyle {
            fg: layer_color(z),
            bg: PLAY_BG,
            bold: false,
            dim: false,
        }
    }

    fn active_style() -> CellStyle {
        CellStyle {
            fg: PLAY_BG,
            bg: ACTIVE_FG,
            bold: true,
            dim: false,
        }
    }

    /// Top-down view. Grid y grows upwards on screen.
    fn draw_plan(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame) {
        let dims = snap.dims;
        for y in 0..dims.y {
            for x in 0..dims.x {
                let (col, row) = (x as u16, (dims.y - 1 - y) as u16);
                match snap.column_top(x, y) {
                    Some(z) => self.fill_cell(fb, frame, col, row, '█', Self::settled_style(z)),
                    None => self.fill_cell(fb, frame, col, row, '·', self.empty_style()),
                }
            }
        }

        let Some(active) = snap.active.as_ref() else {
            return;
        };
        for &c in &active.cells {
            if c.x < 0 || c.x >= dims.x || c.y < 0 || c.y >= dims.y {
                continue;
            }
            // Show the lowest cell of the piece in this column.
            let z = active
                .cells
                .iter()
                .filter(|o| o.x == c.x && o.y == c.y)
                .map(|o| o.z)
                .min()
                .unwrap_or(c.z);
            let (col, row) = (c.x as u16, (dims.y - 1 - c.y) as u16);
            self.put_height(fb, frame, col, row, z);
        }
    }

    /// Side view. Layer z = 0 is the bottom row.
    fn draw_elevation(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame) {
        let dims = snap.dims;
        let (across, depth) = match self.elevation {
            Elevation::Xz => (dims.x, dims.y),
            Elevation::Yz => (dims.y, dims.x),
        };
        let to_grid = |a: i32, d: i32, z: i32| match self.elevation {
            Elevation::Xz => IVec3::new(a, d, z),
            Elevation::Yz => IVec3::new(d, a, z),
        };

        for z in 0..dims.z {
            let row = (dims.z - 1 - z) as u16;
            for a in 0..across {
                let col = a as u16;
                let active = (0..depth).any(|d| snap.is_active(to_grid(a, d, z)));
                let settled = (0..depth)
                    .any(|d| snap.cell(to_grid(a, d, z)) == CellState::Petrified);
                if active {
                    self.fill_cell(fb, frame, col, row, '▓', Self::active_style());
                } else if settled {
                    self.fill_cell(fb, frame, col, row, '█', Self::settled_style(z));
                } else {
                    self.fill_cell(fb, frame, col, row, '·', self.empty_style());
                }
            }
        }
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, col: u16, row: u16, ch: char, style: CellStyle) {
        let (px, py) = self.cell_origin(frame, col, row);
        // Clip to the screen; wide boxes run past the right edge.
        let w = self.cell_w.min(fb.width().saturating_sub(px));
        fb.fill_rect(px, py, w, 1, ch, style);
    }

    fn cell_origin(&self, frame: Frame, col: u16, row: u16) -> (u16, u16) {
        let px = frame.x.saturating_add(1).saturating_add(col.saturating_mul(self.cell_w));
        (px, frame.y.saturating_add(1).saturating_add(row))
    }

    /// Active cell in the plan view, labelled with its layer.
    fn put_height(&self, fb: &mut FrameBuffer, frame: Frame, col: u16, row: u16, z: i32) {
        let style = Self::active_style();
        self.fill_cell(fb, frame, col, row, ' ', style);
        let (px, py) = self.cell_origin(frame, col, row);
        let z = z.max(0) as u32;
        if self.cell_w >= 2 && z < 10 {
            fb.put_u32(px.saturating_add(1), py, z, style);
        } else if self.cell_w >= 2 || z < 10 {
            fb.put_u32(px, py, z, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            ..CellStyle::default()
        };

        let mut y = start_y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("LAYERS", snap.layers_cleared),
            ("PIECES", snap.pieces_spawned),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "STEP", label);
        let end = fb.put_u32(panel_x, y + 1, snap.step_ms, value);
        fb.put_str(end, y + 1, "ms", value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "AI", label);
        y = y.saturating_add(1);
        match adapter {
            Some(st) if st.enabled => {
                let end = fb.put_str(panel_x, y, "ON ", value);
                let end = fb.put_u32(end, y, st.client_count as u32, value);
                fb.put_str(end, y, " cl", value);
                y = y.saturating_add(1);
                let end = fb.put_str(panel_x, y, "CTRL ", value);
                match st.controller_id {
                    Some(id) => fb.put_u32(end, y, id as u32, value),
                    None => fb.put_str(end, y, "-", value),
                };
            }
            _ => {
                fb.put_str(panel_x, y, "OFF", value);
            }
        }
    }
}

/// Frame extent for `cells` grid cells of `cell_w` columns, border included.
fn span(cells: i32, cell_w: u16) -> u16 {
    let cells = u16::try_from(cells.max(0)).unwrap_or(u16::MAX);
    cells.saturating_mul(cell_w).saturating_add(2)
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }
    let right = x.saturating_add(w - 1);
    let bottom = y.saturating_add(h - 1);

    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x.saturating_add(dx), y, '─', style);
        fb.put_char(x.saturating_add(dx), bottom, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y.saturating_add(dy), '│', style);
        fb.put_char(right, y.saturating_add(dy), '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, frame: Frame, text: &str) {
    let mid_y = frame.y.saturating_add(frame.h / 2);
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    let style = CellStyle {
        fg: Rgb::new(255, 255, 255),
        bg: Rgb::new(0, 0, 0),
        bold: true,
        dim: false,
    };
    fb.put_str(x, mid_y, text, style);
}
