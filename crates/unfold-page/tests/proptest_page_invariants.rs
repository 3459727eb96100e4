//! Property-based invariant tests for the expandable page.
//!
//! 1. "About to expand" and "about to collapse" strictly alternate, starting
//!    with "about to expand"
//! 2. Expanded/expanding pages are visible
//! 3. Expanding then collapsing restores the item's geometry
//! 4. The toolbar offset never leaves `[-height, 0]`
//! 5. No panics on arbitrary operation sequences

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use unfold_core::geometry::Size;
use unfold_page::toolbar::toolbar_offset;
use unfold_page::{
    Dimensions, ExpandablePage, ExpandedItem, PageConfig, PageEvent, PageState, Toolbar,
    Visibility,
};

const WIDTH: u32 = 400;
const HEIGHT: u32 = 800;

#[derive(Debug, Clone)]
enum Op {
    Expand(ExpandedItem),
    ExpandImmediately,
    Collapse(ExpandedItem),
    Tick(u64),
    Pull { delta: f32 },
    Release { eligible: bool },
    Stop,
}

// ── Strategies ──────────────────────────────────────────────────────────

fn item_strategy() -> impl Strategy<Value = ExpandedItem> {
    (0u32..WIDTH, 0u32..HEIGHT).prop_flat_map(|(x, y)| {
        (1..=WIDTH - x, 0..=HEIGHT - y)
            .prop_map(move |(w, h)| ExpandedItem::at(x as i32, y as i32, w, h))
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => item_strategy().prop_map(Op::Expand),
        1 => Just(Op::ExpandImmediately),
        3 => item_strategy().prop_map(Op::Collapse),
        6 => (0u64..120).prop_map(Op::Tick),
        2 => (-60.0f32..120.0).prop_map(|delta| Op::Pull { delta }),
        1 => any::<bool>().prop_map(|eligible| Op::Release { eligible }),
        1 => Just(Op::Stop),
    ]
}

fn laid_out() -> ExpandablePage {
    let mut page = ExpandablePage::new(PageConfig::default());
    page.set_layout_size(Size::new(WIDTH, HEIGHT));
    page
}

fn apply(page: &mut ExpandablePage, op: &Op) {
    match op {
        Op::Expand(item) => page.expand(item).expect("expand"),
        Op::ExpandImmediately => page.expand_immediately().expect("expand immediately"),
        Op::Collapse(item) => page.collapse(item).expect("collapse"),
        Op::Tick(ms) => {
            page.tick(Duration::from_millis(*ms)).expect("tick");
        }
        Op::Pull { delta } => {
            let ty = page.translation_y() + delta;
            page.on_pull(*delta, ty, *delta < 0.0, *delta < 0.0, ty.abs() >= 56.0);
        }
        Op::Release { eligible } => page.on_release(*eligible).expect("release"),
        Op::Stop => page.stop_any_ongoing_animation().expect("stop"),
    }
}

proptest! {
    #[test]
    fn about_to_events_alternate(ops in prop::collection::vec(op_strategy(), 0..48)) {
        let mut page = laid_out();
        let log: Rc<RefCell<Vec<PageEvent>>> = Rc::default();
        let sink = Rc::clone(&log);
        page.subscribe(Rc::new(move |event: &PageEvent, _: PageState| {
            sink.borrow_mut().push(*event);
        }));

        for op in &ops {
            apply(&mut page, op);
            if page.state().is_expanded_or_expanding() {
                prop_assert_eq!(page.visibility(), Visibility::Visible);
            }
        }

        let mut expect_expand = true;
        for event in log.borrow().iter() {
            match event {
                PageEvent::AboutToExpand { .. } => {
                    prop_assert!(expect_expand, "double about-to-expand in {:?}", log.borrow());
                    expect_expand = false;
                }
                PageEvent::AboutToCollapse { .. } => {
                    prop_assert!(!expect_expand, "double about-to-collapse in {:?}", log.borrow());
                    expect_expand = true;
                }
                _ => {}
            }
        }
    }

    #[test]
    fn expand_is_idempotent(item in item_strategy(), repeats in 1usize..5) {
        let mut page = laid_out();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        page.subscribe(Rc::new(move |event: &PageEvent, _: PageState| {
            if matches!(event, PageEvent::AboutToExpand { .. }) {
                *sink.borrow_mut() += 1;
            }
        }));
        for _ in 0..repeats {
            page.expand(&item).expect("expand");
        }
        prop_assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn expand_collapse_round_trip(item in item_strategy()) {
        let mut page = laid_out();
        page.expand(&item).expect("expand");
        let aligned = page.clipped_dimensions();
        while page.is_animating() {
            page.tick(Duration::from_millis(16)).expect("tick");
        }
        page.collapse(&item).expect("collapse");
        while page.is_animating() {
            page.tick(Duration::from_millis(16)).expect("tick");
        }

        let rect = item.location;
        prop_assert_eq!(page.state(), PageState::Collapsed);
        prop_assert_eq!(page.clipped_dimensions(), aligned);
        prop_assert_eq!(aligned, Dimensions::new(rect.width as f32, rect.height as f32));
        prop_assert_eq!(page.translation_x(), rect.left() as f32);
        prop_assert_eq!(page.translation_y(), rect.top() as f32);
    }

    #[test]
    fn toolbar_offset_stays_in_range(
        show in any::<bool>(),
        page_ty in -2000.0f32..2000.0,
        height in 0.0f32..500.0,
        current in -600.0f32..100.0,
    ) {
        if let Some(offset) = toolbar_offset(show, page_ty, height, current) {
            prop_assert!(offset >= -height && offset <= 0.0, "offset {offset} for height {height}");
        }
    }

    #[test]
    fn page_keeps_toolbar_in_range(
        height in 1.0f32..300.0,
        ops in prop::collection::vec(op_strategy(), 0..48),
    ) {
        let toolbar = Rc::new(RefCell::new(Toolbar::new(height)));
        let mut page = laid_out();
        page.set_toolbar(Some(&toolbar));

        for op in &ops {
            apply(&mut page, op);
            let offset = toolbar.borrow().translation_y;
            prop_assert!(
                offset >= -height && offset <= 0.0,
                "offset {} outside [-{}, 0] after {:?}", offset, height, op
            );
        }
    }
}
