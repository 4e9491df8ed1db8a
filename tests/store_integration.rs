//! Cross-module tests: store dispatch over builder-produced and combined
//! reducers, structural sharing observed through the public API.

use duxide::{
    combine_reducers, create_reducer, path, state, Action, DuxideError, Reducer, Store,
};
use std::cell::RefCell;
use std::rc::Rc;

fn hp_reducer(initial_hp: i64) -> Reducer {
    create_reducer(state!({"hp": initial_hp}), |b| {
        b.add_case("DAMAGE", |s, d, a| {
            let hp = s.get("hp").and_then(|v| v.as_i64()).unwrap_or(0);
            d.set(path!("hp"), hp - a.payload_i64().unwrap_or(0))
        })?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn damage_scenario_end_to_end() {
    let mut store = Store::from_reducer(hp_reducer(100)).unwrap();
    let returned = store.dispatch(&Action::with_payload("DAMAGE", 8)).unwrap();
    assert_eq!(returned, state!({"hp": 92}));
    assert_eq!(store.get_state(), state!({"hp": 92}));
}

#[test]
fn dispatch_shares_untouched_slices() {
    let reducer = combine_reducers([("player", hp_reducer(100))]);
    let initial = state!({
        "player": {"hp": 100},
        "world": {"name": "crypt", "rooms": [1, 2, 3]}
    });
    let mut store = Store::new(reducer, initial.clone());

    let next = store.dispatch(&Action::with_payload("DAMAGE", 30)).unwrap();

    // The untouched slice is carried by reference, the touched one is new.
    assert!(next.get("world").unwrap().ptr_eq(initial.get("world").unwrap()));
    assert!(!next.get("player").unwrap().ptr_eq(initial.get("player").unwrap()));
    assert_eq!(
        next.get_path(&path!("player", "hp")).and_then(|v| v.as_i64()),
        Some(70)
    );
    // The value captured before dispatch is unchanged in every field.
    assert_eq!(
        initial,
        state!({
            "player": {"hp": 100},
            "world": {"name": "crypt", "rooms": [1, 2, 3]}
        })
    );
}

#[test]
fn unknown_action_leaves_state_equal() {
    let mut store = Store::from_reducer(hp_reducer(100)).unwrap();
    let before = store.get_state();
    let after = store.dispatch(&Action::new("NOT_REGISTERED")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn subscriber_pairs_follow_consecutive_dispatches() {
    let mut store = Store::from_reducer(hp_reducer(100)).unwrap();
    let pairs: Rc<RefCell<Vec<(i64, i64)>>> = Rc::new(RefCell::new(Vec::new()));
    let pairs_handler = Rc::clone(&pairs);
    let _sub = store.subscribe(move |prev, next| {
        pairs_handler.borrow_mut().push((
            prev.get("hp").and_then(|v| v.as_i64()).unwrap_or(-1),
            next.get("hp").and_then(|v| v.as_i64()).unwrap_or(-1),
        ));
    });

    store.dispatch(&Action::with_payload("DAMAGE", 8)).unwrap();
    store.dispatch(&Action::with_payload("DAMAGE", 2)).unwrap();

    assert_eq!(*pairs.borrow(), vec![(100, 92), (92, 90)]);
}

#[test]
fn combined_store_tolerates_missing_slice() {
    let reducer = combine_reducers([
        ("player", hp_reducer(100)),
        ("companion", hp_reducer(100)),
    ]);
    // No "companion" field: that slice is skipped without error.
    let mut store = Store::new(reducer, state!({"player": {"hp": 100}}));
    let next = store.dispatch(&Action::with_payload("DAMAGE", 5)).unwrap();
    assert_eq!(next, state!({"player": {"hp": 95}}));
}

#[test]
fn registration_error_surfaces_before_any_store_exists() {
    let result = create_reducer(state!({}), |b| {
        b.add_case("", |_, _, _| Ok(()))?;
        Ok(())
    });
    assert!(matches!(result.unwrap_err(), DuxideError::Validation { .. }));
}
