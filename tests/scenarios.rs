//! End-to-end scenarios exercising the public API.

use serde_json::json;
use statecraft::{
    register_states, Filter, FsmBuilder, FsmConfig, FsmError, Guard, RejectReason, Selection,
    State, StateId, StateSpec, TransitionBuilder, TransitionDefinition,
};
use std::sync::{Arc, Mutex};

mod wizard {
    use super::*;

    pub struct Wizard {
        pub fsm: statecraft::Fsm,
        pub steps: [StateId; 3],
        pub log: Arc<Mutex<Vec<String>>>,
    }

    pub fn build() -> Wizard {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = FsmBuilder::new();
        let steps: Vec<StateId> = (1..=3)
            .map(|order| {
                let enter = Arc::clone(&log);
                let exit = Arc::clone(&log);
                builder.state(
                    State::new(format!("Step {order}"))
                        .order(order)
                        .on_enter(move |fsm, _, _| {
                            enter
                                .lock()
                                .unwrap()
                                .push(format!("enter {}", fsm.current().name()));
                            Ok(())
                        })
                        .on_exit(move |fsm, _, _| {
                            exit.lock()
                                .unwrap()
                                .push(format!("exit {}", fsm.current().name()));
                            Ok(())
                        }),
                )
            })
            .collect();
        let steps = [steps[0], steps[1], steps[2]];

        builder.transition(
            TransitionDefinition::new("continue", steps[0], [steps[1], steps[2]])
                .select(Selection::FirstNextState),
        );
        builder.transition(
            TransitionDefinition::new("back", [steps[1], steps[2]], steps.to_vec())
                .select(Selection::FirstPreviousState),
        );
        builder.transition(TransitionDefinition::new("first_to_second", steps[0], steps[1]));
        builder.start(steps[0]);

        Wizard {
            fsm: builder.build().unwrap(),
            steps,
            log,
        }
    }
}

#[test]
fn wizard_steps_forward_and_back() {
    let wizard::Wizard { mut fsm, steps, log } = wizard::build();
    assert_eq!(fsm.current_state(), steps[0]);

    fsm.transition_to(steps[1], None).unwrap();
    assert_eq!(fsm.current_state(), steps[1]);

    fsm.transition_by_name("back", None, None).unwrap();
    assert_eq!(fsm.current_state(), steps[0]);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["exit Step 1", "enter Step 2", "exit Step 2", "enter Step 1"]
    );
    assert_eq!(fsm.state(steps[0]).unwrap().count(), 2);
}

#[test]
fn wizard_continue_skips_to_lowest_next_step() {
    let wizard::Wizard { fsm, steps, .. } = wizard::build();

    let contributed = fsm.transitions_for("continue").unwrap();
    assert_eq!(contributed.len(), 1);
    assert_eq!(contributed[0].to, steps[1]);
    assert!(!fsm.can_transition_to(steps[2]));
}

#[test]
fn wizard_single_target_definition() {
    let wizard::Wizard { mut fsm, steps, .. } = wizard::build();
    let id = fsm.definition_id("first_to_second").unwrap();

    fsm.transition_by_definition(id, None, None).unwrap();
    assert_eq!(fsm.current_state(), steps[1]);
    assert_eq!(fsm.last_transition().unwrap().definition, id);
}

#[test]
fn website_initialize_and_navigate() {
    let mut builder = FsmBuilder::new();
    register_states! { builder;
        start = State::new("Start State"),
        application = State::new("Application View").data(json!({"path": "application/:id"})),
        entity = State::new("Entity View").data(json!({"path": "entity/:id"})),
        document = State::new("Document View").data(json!({"path": "document/:id"})),
    }
    let pages = vec![application, entity, document];
    builder.transition(TransitionDefinition::new(
        "initialize",
        StateSpec::resolver(move |_| start),
        pages.clone(),
    ));
    builder.transition(TransitionDefinition::new("any", pages.clone(), pages));
    builder.start(start);
    let mut fsm = builder.build().unwrap();

    fsm.initialize(json!({"name": "website name"})).unwrap();
    assert_eq!(fsm.current_state(), start);
    assert_eq!(fsm.data()["name"], "website name");
    assert_eq!(fsm.current().count(), 1);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    fsm.subscribe_transitions(move |t| sink.lock().unwrap().push((t.definition, t.to)));

    fsm.transition_to(application, None).unwrap();
    fsm.transition_to(document, None).unwrap();

    let initialize = fsm.definition_id("initialize").unwrap();
    let any = fsm.definition_id("any").unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(initialize, application), (any, document)]
    );
    assert_eq!(
        fsm.current().state_data(),
        Some(&json!({"path": "document/:id"}))
    );
}

#[test]
fn self_transitions_count_entries() {
    let mut builder = FsmBuilder::new();
    let page = builder.state(State::new("page"));
    builder.transition(TransitionDefinition::new("reload", page, page));
    builder.start(page);
    let mut fsm = builder.build().unwrap();

    fsm.transition_to(page, None).unwrap();
    fsm.transition_to(page, None).unwrap();

    assert_eq!(fsm.current().count(), 3);
    assert_eq!(fsm.history().get_path(), vec![page, page, page]);
}

#[test]
fn filter_diagnostics_list_both_sides() {
    let mut builder = FsmBuilder::new();
    let review = builder.state(State::new("review").order(2));
    let approved = builder.state(State::new("approved").order(3));
    let rejected = builder.state(State::new("rejected").order(1));
    builder.transition(
        TransitionBuilder::new("decide")
            .from(review)
            .to(vec![approved, rejected])
            .guard(
                Guard::new(move |fsm, _, to, _| to != approved || fsm.data()["score"] == 10)
                    .named("needs_perfect_score"),
            )
            .select(Selection::custom(|candidates, _| candidates.to_vec()))
            .build()
            .unwrap(),
    );
    builder.start(review).data(json!({"score": 7}));
    let mut fsm = builder.build().unwrap();

    let error = fsm
        .transition_by_filter(
            |possible, fsm| {
                Filter::MaxState
                    .apply(possible, fsm)
                    .into_iter()
                    .filter(|t| t.to == approved)
                    .collect()
            },
            None,
        )
        .unwrap_err();

    let rejection = error.rejection().unwrap();
    assert_eq!(rejection.reason, RejectReason::FilterEmpty);
    assert_eq!(rejection.possible[0].to, rejected);
    assert_eq!(rejection.impossible[0].to, approved);
    assert_eq!(
        rejection.impossible[0].failing_guards[0].name.as_deref(),
        Some("needs_perfect_score")
    );
    assert_eq!(error.error_code(), "TRANSITION_NOT_POSSIBLE");
    assert_eq!(fsm.current_state(), review);

    fsm.transition_by_filter(|possible, fsm| Filter::MinState.apply(possible, fsm), None)
        .unwrap();
    assert_eq!(fsm.current_state(), rejected);
}

#[test]
fn dynamic_resolvers_follow_machine_data() {
    let mut builder = FsmBuilder::new();
    let idle = builder.state(State::new("idle"));
    let fast = builder.state(State::new("fast"));
    let slow = builder.state(State::new("slow"));
    builder.transition(TransitionDefinition::new(
        "go",
        idle,
        StateSpec::resolver(move |fsm| {
            if fsm.data()["hurry"] == true {
                fast
            } else {
                slow
            }
        }),
    ));
    builder.start(idle);
    let mut fsm = builder.build().unwrap();

    assert!(fsm.can_transition_to(slow));
    fsm.change_data(json!({"hurry": true}));
    assert!(fsm.can_transition_to(fast));
    assert!(!fsm.can_transition_to(slow));

    fsm.transition_by_name("go", None, None).unwrap();
    assert_eq!(fsm.current_state(), fast);
}

#[test]
fn history_respects_configured_limit() {
    let mut builder = FsmBuilder::new();
    let a = builder.state(State::new("a"));
    let b = builder.state(State::new("b"));
    builder.transition(TransitionDefinition::new("flip", [a, b], [a, b]).select(
        Selection::custom(|candidates, fsm| {
            candidates
                .iter()
                .filter(|t| t.to != fsm.current_state())
                .cloned()
                .collect()
        }),
    ));
    builder.start(a).config(FsmConfig::from_json(r#"{"history_limit": 2}"#).unwrap());
    let mut fsm = builder.build().unwrap();

    for _ in 0..5 {
        fsm.transition_by_name("flip", None, None).unwrap();
    }

    assert_eq!(fsm.history().len(), 2);
    assert_eq!(fsm.history().records()[1].sequence, 5);
    assert_eq!(fsm.state(a).unwrap().count(), 3);
    assert_eq!(fsm.state(b).unwrap().count(), 3);
}

#[test]
fn hook_errors_surface_with_context() {
    let mut builder = FsmBuilder::new();
    let a = builder.state(State::new("a"));
    let b = builder.state(State::new("vault").on_enter(|_, _, _| Err("alarm tripped".into())));
    builder.transition(TransitionDefinition::new("open", a, b));
    builder.start(a);
    let mut fsm = builder.build().unwrap();

    let error = fsm.transition_to(b, None).unwrap_err();

    assert_eq!(
        error.to_string(),
        "enter hook of state 'vault' failed: alarm tripped"
    );
    assert!(matches!(error, FsmError::HookFailed { .. }));
    assert_eq!(error.error_code(), "HOOK_FAILED");
}

#[test]
fn machines_do_not_share_candidates() {
    let build = || {
        let mut builder = FsmBuilder::new();
        let a = builder.state(State::new("a"));
        let b = builder.state(State::new("b"));
        builder.transition(TransitionDefinition::new("go", a, b));
        builder.start(a);
        builder.build().unwrap()
    };
    let first = build();
    let mut second = build();
    assert_ne!(first.id(), second.id());

    let foreign = first.current_transitions()[0].clone();
    let error = second.transition(foreign, None).unwrap_err();
    assert_eq!(
        error.rejection().map(|r| r.reason),
        Some(RejectReason::NotCurrentState)
    );
}
