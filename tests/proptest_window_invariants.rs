//! Property-based invariant tests for view ordering and grabs.
//!
//! 1. A move grab lands on origin + total pointer delta, whatever the path.
//! 2. A resize grab never moves an edge that is not being dragged.
//! 3. A resize grab never shrinks a dragged axis below the floor.
//! 4. Raising is idempotent and leaves user order alone.
//! 5. cycle_next and cycle_prev are inverses.
//! 6. Removing a view keeps the relative order of the rest.

use mwd::core::window::{
    constrain_size, GrabMode, GrabSession, Order, SizeConstraints, View, ViewTree,
};
use mwd::platform::api::SurfaceId;
use mwd::util::geometry::{Edges, Rect};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect() -> impl Strategy<Value = Rect> {
    (-500i32..500, -500i32..500, 1i32..800, 1i32..800).prop_map(|(x, y, w, h)| {
        Rect::from_xywh(x as f64, y as f64, w as f64, h as f64)
    })
}

fn point() -> impl Strategy<Value = (f64, f64)> {
    (-2000i32..2000, -2000i32..2000).prop_map(|(x, y)| (x as f64, y as f64))
}

fn resize_edges() -> impl Strategy<Value = Edges> {
    let vertical = prop_oneof![Just(Edges::empty()), Just(Edges::TOP), Just(Edges::BOTTOM)];
    let horizontal = prop_oneof![Just(Edges::empty()), Just(Edges::LEFT), Just(Edges::RIGHT)];
    (vertical, horizontal).prop_map(|(v, h)| v | h)
}

fn tree_of(count: u32) -> ViewTree {
    let mut tree = ViewTree::new();
    for n in 1..=count {
        tree.insert(View::toplevel(SurfaceId(n)));
    }
    tree
}

fn grab(mode: GrabMode, edges: Edges, origin: Rect, start: (f64, f64)) -> GrabSession {
    let tree = tree_of(1);
    let mut session = GrabSession::new();
    if let Some(id) = tree.front(Order::Draw) {
        session.begin(id, mode, edges, origin, start);
    }
    session
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Move exactness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_tracks_total_delta(
        origin in rect(),
        start in point(),
        path in proptest::collection::vec(point(), 1..20),
    ) {
        let session = grab(GrabMode::Move, Edges::TOP | Edges::LEFT, origin, start);
        let mut last = origin;
        for (x, y) in &path {
            last = session.moved(*x, *y);
        }
        let (x, y) = path[path.len() - 1];
        prop_assert_eq!(last, origin.translate(x - start.0, y - start.1));
        prop_assert_eq!(last.width(), origin.width());
        prop_assert_eq!(last.height(), origin.height());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Undragged edges stay put
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_moves_only_dragged_edges(
        origin in rect(),
        edges in resize_edges(),
        start in point(),
        end in point(),
        floor in 0i32..200,
    ) {
        let session = grab(GrabMode::Resize, edges, origin, start);
        let constraints = SizeConstraints::UNCONSTRAINED.with_floor(floor as f64);
        let resized = session.resized(end.0, end.1, &constraints);

        if !edges.contains(Edges::TOP) {
            prop_assert_eq!(resized.top, origin.top);
        }
        if !edges.contains(Edges::BOTTOM) {
            prop_assert_eq!(resized.bottom, origin.bottom);
        }
        if !edges.contains(Edges::LEFT) {
            prop_assert_eq!(resized.left, origin.left);
        }
        if !edges.contains(Edges::RIGHT) {
            prop_assert_eq!(resized.right, origin.right);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. The floor holds on dragged axes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_respects_floor(
        origin in rect(),
        edges in resize_edges(),
        start in point(),
        end in point(),
        floor in 1i32..200,
    ) {
        let session = grab(GrabMode::Resize, edges, origin, start);
        let constraints = SizeConstraints::UNCONSTRAINED.with_floor(floor as f64);
        let resized = session.resized(end.0, end.1, &constraints);

        if edges.intersects(Edges::LEFT | Edges::RIGHT) {
            prop_assert!(resized.width() >= floor as f64);
        }
        if edges.intersects(Edges::TOP | Edges::BOTTOM) {
            prop_assert!(resized.height() >= floor as f64);
        }
    }

    #[test]
    fn constrain_respects_bounds(
        origin in rect(),
        min in 1i32..300,
        extra in 0i32..300,
    ) {
        let max = (min + extra) as f64;
        let constraints = SizeConstraints::new(min as f64, max, min as f64, max);
        let mut rect = origin;
        constrain_size(Edges::BOTTOM | Edges::RIGHT, &constraints, &mut rect);

        prop_assert!(rect.width() >= min as f64 && rect.width() <= max);
        prop_assert!(rect.height() >= min as f64 && rect.height() <= max);
        prop_assert_eq!((rect.top, rect.left), (origin.top, origin.left));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Raise is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn raise_is_idempotent(count in 1u32..12, pick in any::<prop::sample::Index>()) {
        let mut tree = tree_of(count);
        let user_before = tree.ids(Order::User);
        let id = user_before[pick.index(user_before.len())];

        tree.raise(id);
        let once = tree.ids(Order::Draw);
        tree.raise(id);

        prop_assert_eq!(tree.ids(Order::Draw), once);
        prop_assert_eq!(tree.front(Order::Draw), Some(id));
        prop_assert_eq!(tree.ids(Order::User), user_before);
        prop_assert_eq!(tree.len_of(Order::Draw), count as usize);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Cycling both ways is an identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cycle_next_undoes_cycle_prev(count in 1u32..12) {
        let tree = tree_of(count);
        for id in tree.ids(Order::User) {
            let prev = tree.cycle_prev(id).unwrap();
            let next = tree.cycle_next(id).unwrap();
            prop_assert_eq!(tree.cycle_next(prev), Some(id));
            prop_assert_eq!(tree.cycle_prev(next), Some(id));
        }
    }

    #[test]
    fn full_cycle_visits_every_view(count in 1u32..12) {
        let tree = tree_of(count);
        let Some(start) = tree.front(Order::User) else {
            return Ok(());
        };
        let mut seen = vec![start];
        let mut current = tree.cycle_prev(start).unwrap();
        while current != start {
            seen.push(current);
            current = tree.cycle_prev(current).unwrap();
        }
        prop_assert_eq!(seen, tree.ids(Order::User));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Removal keeps relative order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn remove_keeps_order(
        count in 1u32..12,
        raises in proptest::collection::vec(any::<prop::sample::Index>(), 0..10),
        victim in any::<prop::sample::Index>(),
    ) {
        let mut tree = tree_of(count);
        let ids = tree.ids(Order::User);
        for pick in &raises {
            tree.raise(ids[pick.index(ids.len())]);
        }
        let victim = ids[victim.index(ids.len())];

        let mut expected_draw = tree.ids(Order::Draw);
        expected_draw.retain(|id| *id != victim);
        let mut expected_user = tree.ids(Order::User);
        expected_user.retain(|id| *id != victim);

        prop_assert!(tree.remove(victim).is_some());
        prop_assert!(tree.get(victim).is_none());
        prop_assert_eq!(tree.ids(Order::Draw), expected_draw);
        prop_assert_eq!(tree.ids(Order::User), expected_user);
        prop_assert_eq!(tree.len(), count as usize - 1);
    }
}
