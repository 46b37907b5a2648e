//! Multi-tab scenarios: two `LiveSync` instances over one shared storage
//! profile and one signal hub, the way two browser tabs share local
//! storage and storage events.

use std::sync::{Arc, Mutex};

use match_sync::{
    ChangeNotice, InMemoryBackend, InMemoryHub, LiveSync, MapPlan, MatchSetup, Mutation,
    PlayerSeed, Signal, SignalChannel, StatField, TeamSide, ROSTER_SIZE,
};

fn seeds(prefix: &str) -> Vec<PlayerSeed> {
    (1..=ROSTER_SIZE)
        .map(|slot| PlayerSeed {
            player_id: format!("{}{}", prefix, slot),
            display_name: format!("Player {}", slot),
        })
        .collect()
}

fn bo3() -> MatchSetup {
    MatchSetup {
        best_of: 3,
        maps: vec![
            MapPlan {
                map_name: "Tokyo 2099".into(),
                game_mode: "Convergence".into(),
            },
            MapPlan {
                map_name: "Yggsgard".into(),
                game_mode: "Domination".into(),
            },
            MapPlan {
                map_name: "Klyntar".into(),
                game_mode: "Convoy".into(),
            },
        ],
        team_a: seeds("a"),
        team_b: seeds("b"),
    }
}

struct Profile {
    backend: InMemoryBackend,
    hub: InMemoryHub,
}

impl Profile {
    fn new() -> Self {
        Self {
            backend: InMemoryBackend::new(),
            hub: InMemoryHub::new(),
        }
    }

    /// Open a new "tab" against this profile.
    fn open(&self) -> LiveSync<InMemoryBackend, match_sync::HubEndpoint> {
        LiveSync::new(self.backend.clone(), self.hub.endpoint())
    }
}

#[test]
fn an_edit_reaches_subscribers_in_other_tabs() {
    let profile = Profile::new();
    let admin = profile.open();
    let viewer = profile.open();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    let sub = viewer.subscribe("m1", move |snap| {
        seen_cb.lock().unwrap().push((snap.version, snap.series_score_a));
    });

    admin.apply("m1", Mutation::Initialize(bo3())).unwrap();
    admin
        .apply(
            "m1",
            Mutation::RecordMapWin {
                winner: TeamSide::A,
            },
        )
        .unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), [(1, 0), (2, 1)]);
    // the viewer's own cache read agrees
    assert_eq!(viewer.get("m1").unwrap().unwrap().version, 2);
    sub.unsubscribe();
}

#[test]
fn publishing_tab_hears_its_own_edit_exactly_once() {
    let profile = Profile::new();
    let admin = profile.open();
    let _viewer = profile.open();

    let count = Arc::new(Mutex::new(0));
    let count_cb = Arc::clone(&count);
    let sub = admin.subscribe("m1", move |_snap| *count_cb.lock().unwrap() += 1);

    admin.apply("m1", Mutation::Initialize(bo3())).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
    sub.unsubscribe();
}

#[test]
fn relayed_changes_are_not_rebroadcast() {
    let profile = Profile::new();
    let admin = profile.open();
    let viewer = profile.open();
    let sub = viewer.subscribe("m1", |_snap| {});

    admin.apply("m1", Mutation::Initialize(bo3())).unwrap();

    // one mutation, one signal on the hub - the viewer's relay added none
    assert_eq!(profile.hub.len(), 1);
    sub.unsubscribe();
}

#[test]
fn duplicate_signals_for_one_version_deliver_once() {
    let profile = Profile::new();
    let admin = profile.open();
    let viewer = profile.open();

    let count = Arc::new(Mutex::new(0));
    let count_cb = Arc::clone(&count);
    let sub = viewer.subscribe("m1", move |_snap| *count_cb.lock().unwrap() += 1);

    let snap = admin.apply("m1", Mutation::Initialize(bo3())).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);

    // a flaky transport repeats the same notice
    let stray = profile.hub.endpoint();
    let notice = ChangeNotice {
        match_id: "m1".into(),
        version: snap.version,
    };
    let signal = Signal::encode("match_update_m1", &notice).unwrap();
    stray.broadcast(signal.clone()).unwrap();
    stray.broadcast(signal).unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
    sub.unsubscribe();
}

#[test]
fn stale_versions_are_discarded() {
    let profile = Profile::new();
    let admin = profile.open();
    let viewer = profile.open();

    let versions = Arc::new(Mutex::new(Vec::new()));
    let versions_cb = Arc::clone(&versions);
    let sub = viewer.subscribe("m1", move |snap| {
        versions_cb.lock().unwrap().push(snap.version);
    });

    admin.apply("m1", Mutation::Initialize(bo3())).unwrap();
    admin
        .apply(
            "m1",
            Mutation::AdjustMapScore {
                delta_a: 1,
                delta_b: 0,
            },
        )
        .unwrap();

    // an out-of-order notice for version 1 arrives after version 2
    let stray = profile.hub.endpoint();
    let signal = Signal::encode(
        "match_update_m1",
        &ChangeNotice {
            match_id: "m1".into(),
            version: 1,
        },
    )
    .unwrap();
    stray.broadcast(signal).unwrap();

    assert_eq!(versions.lock().unwrap().as_slice(), [1, 2]);
    sub.unsubscribe();
}

#[test]
fn subscribing_before_the_match_exists_works() {
    let profile = Profile::new();
    let viewer = profile.open();

    assert_eq!(viewer.get("m9").unwrap(), None);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    let sub = viewer.subscribe("m9", move |snap| {
        seen_cb.lock().unwrap().push(snap.version);
    });

    let admin = profile.open();
    admin.apply("m9", Mutation::Initialize(bo3())).unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), [1]);
    sub.unsubscribe();
}

#[test]
fn signals_outside_the_key_namespace_are_ignored() {
    let profile = Profile::new();
    let viewer = profile.open();
    let count = Arc::new(Mutex::new(0));
    let count_cb = Arc::clone(&count);
    let sub = viewer.subscribe("m1", move |_snap| *count_cb.lock().unwrap() += 1);

    let stray = profile.hub.endpoint();
    stray
        .broadcast(Signal {
            key: "bracket_state_4".into(),
            payload: vec![1, 2, 3],
        })
        .unwrap();
    // garbage payload under our namespace is logged and dropped
    stray
        .broadcast(Signal {
            key: "match_update_m1".into(),
            payload: vec![0xff, 0x13],
        })
        .unwrap();

    assert_eq!(*count.lock().unwrap(), 0);
    sub.unsubscribe();
}

#[test]
fn each_tab_tracks_versions_independently() {
    let profile = Profile::new();
    let admin = profile.open();
    let viewer_a = profile.open();
    let viewer_b = profile.open();

    let seen_a = Arc::new(Mutex::new(Vec::new()));
    let seen_a_cb = Arc::clone(&seen_a);
    let sub_a = viewer_a.subscribe("m1", move |snap| {
        seen_a_cb.lock().unwrap().push(snap.version);
    });

    admin.apply("m1", Mutation::Initialize(bo3())).unwrap();

    // a late-joining tab still gets the next update even though it missed v1
    let seen_b = Arc::new(Mutex::new(Vec::new()));
    let seen_b_cb = Arc::clone(&seen_b);
    let sub_b = viewer_b.subscribe("m1", move |snap| {
        seen_b_cb.lock().unwrap().push(snap.version);
    });

    admin
        .apply(
            "m1",
            Mutation::AdjustPlayerStat {
                player_id: "a1".into(),
                stat: StatField::Damage,
                delta: 2500,
            },
        )
        .unwrap();

    assert_eq!(seen_a.lock().unwrap().as_slice(), [1, 2]);
    assert_eq!(seen_b.lock().unwrap().as_slice(), [2]);
    sub_a.unsubscribe();
    sub_b.unsubscribe();
}
