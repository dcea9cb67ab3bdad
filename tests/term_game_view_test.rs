use glam::IVec3;

use voxel_tetris::core::{Board, Game, GameSnapshot};
use voxel_tetris::term::{layer_color, AdapterStatusView, FrameBuffer, GameView, Rgb, Viewport};
use voxel_tetris::types::{CameraHint, GameConfig};

// Default 6x6x20 box in an 80x30 viewport: the plan frame's top-left corner
// sits at (18, 4) and each grid cell is two columns wide.
const PLAN_X: u16 = 18;
const PLAN_Y: u16 = 4;

fn plan_cell(x: u16, y: u16) -> (u16, u16) {
    (PLAN_X + 1 + x * 2, PLAN_Y + 1 + (5 - y))
}

fn screen_text(fb: &FrameBuffer) -> String {
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn started_snapshot(board: Option<Board>) -> GameSnapshot {
    let config = GameConfig::default();
    let mut game = match board {
        Some(board) => Game::with_board(config, board),
        None => Game::new(config),
    };
    game.start();
    game.snapshot()
}

#[test]
fn renders_titles_and_side_panel() {
    let view = GameView::default();
    let fb = view.render(&started_snapshot(None), None, Viewport::new(80, 30));
    let text = screen_text(&fb);
    assert!(text.contains("PLAN"));
    assert!(text.contains("SIDE XZ"));
    assert!(text.contains("SCORE"));
    assert!(text.contains("PIECES"));
    assert!(text.contains("1000ms"));
    assert!(text.contains("OFF"));
    assert!(!text.contains("GAME OVER"));
}

#[test]
fn adapter_status_is_shown() {
    let view = GameView::default();
    let status = AdapterStatusView {
        enabled: true,
        client_count: 2,
        controller_id: Some(1),
    };
    let fb = view.render(&started_snapshot(None), Some(&status), Viewport::new(80, 30));
    let text = screen_text(&fb);
    assert!(text.contains("ON 2 cl"));
    assert!(text.contains("CTRL 1"));
}

#[test]
fn active_piece_shows_its_layer_in_plan() {
    let view = GameView::default();
    let fb = view.render(&started_snapshot(None), None, Viewport::new(80, 30));
    // Every template covers its anchor, so column (2, 2) holds the piece at z = 15.
    let (px, py) = plan_cell(2, 2);
    assert_eq!(fb.get(px, py).map(|c| c.ch), Some('1'));
    assert_eq!(fb.get(px + 1, py).map(|c| c.ch), Some('5'));
}

#[test]
fn settled_columns_use_layer_colour() {
    let mut board = Board::new(IVec3::new(6, 6, 20));
    board.add_static_block(IVec3::new(0, 0, 0));
    board.add_static_block(IVec3::new(5, 0, 0));
    board.add_static_block(IVec3::new(5, 0, 1));

    let view = GameView::default();
    let fb = view.render(&started_snapshot(Some(board)), None, Viewport::new(80, 30));

    let (px, py) = plan_cell(0, 0);
    let cell = fb.get(px, py).unwrap();
    assert_eq!(cell.ch, '█');
    assert_eq!(cell.style.fg, layer_color(0));

    let (px, py) = plan_cell(5, 0);
    assert_eq!(fb.get(px, py).unwrap().style.fg, layer_color(1));
}

#[test]
fn blocked_flash_colours_border() {
    let view = GameView::default();
    let mut snap = started_snapshot(None);
    let normal = view.render(&snap, None, Viewport::new(80, 30));
    snap.blocked = true;
    let flashing = view.render(&snap, None, Viewport::new(80, 30));

    let corner = |fb: &FrameBuffer| fb.get(PLAN_X, PLAN_Y).unwrap();
    assert_eq!(corner(&normal).ch, '┌');
    assert_eq!(corner(&flashing).ch, '┌');
    assert_eq!(corner(&flashing).style.fg, Rgb::new(255, 220, 0));
    assert_ne!(corner(&normal).style.fg, corner(&flashing).style.fg);
}

#[test]
fn game_over_overlay() {
    let mut board = Board::new(IVec3::new(6, 6, 20));
    for y in 0..6 {
        for x in 0..6 {
            board.add_static_block(IVec3::new(x, y, 14));
        }
    }
    let snap = started_snapshot(Some(board));
    assert!(snap.game_over());

    let fb = GameView::default().render(&snap, None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("GAME OVER"));
}

#[test]
fn camera_hint_switches_side_face() {
    let mut view = GameView::default();
    view.apply_camera_hint(CameraHint {
        x: 2.0,
        y: 0.5,
        z: 10.0,
    });
    let fb = view.render(&started_snapshot(None), None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("SIDE YZ"));

    view.cycle_elevation();
    let fb = view.render(&started_snapshot(None), None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("SIDE XZ"));
}

#[test]
fn render_into_reuses_buffer_across_sizes() {
    let view = GameView::default();
    let snap = started_snapshot(None);
    let mut fb = FrameBuffer::new(0, 0);
    view.render_into(&snap, None, Viewport::new(80, 30), &mut fb);
    assert_eq!((fb.width(), fb.height()), (80, 30));
    view.render_into(&snap, None, Viewport::new(100, 40), &mut fb);
    assert_eq!((fb.width(), fb.height()), (100, 40));
    assert!(screen_text(&fb).contains("PLAN"));
}

#[test]
fn oversized_grid_and_cell_width_render_without_overflow() {
    let snap = GameSnapshot {
        dims: IVec3::new(40_000, 6, 20),
        ..Default::default()
    };
    let fb = GameView::default().render(&snap, None, Viewport::new(80, 30));
    assert_eq!((fb.width(), fb.height()), (80, 30));

    let fb = GameView::new(u16::MAX).render(&started_snapshot(None), None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("PLAN"));
}
