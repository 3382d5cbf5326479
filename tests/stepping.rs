use jdwp_server::spec::{
    event::{Composite, Event},
    event_request::{self, Modifier, Set},
    thread_reference::{FrameCount, Resume},
    virtual_machine, *,
};

mod common;

use common::{location, thread_id, Interpreter, TestClient, M, MAIN, N, O};

/// main: line 9 at 0..2, line 10 at 2..5 with a call to check at 3, line
/// 11 from 5 on.
fn main_calling_check(interpreter: &Interpreter) {
    interpreter.call(M, None);
    interpreter.run(0..4);
    interpreter.call(N, None);
    interpreter.run(0..2);
    interpreter.ret(Some(Value::Int(0)));
    interpreter.run(4..7);
    interpreter.ret(None);
}

fn breakpoint(client: &mut TestClient, method: u64, index: u64) -> RequestID {
    client
        .send(Set::new(
            EventKind::Breakpoint,
            SuspendPolicy::EventThread,
            vec![Modifier::LocationOnly(location(method, index))],
        ))
        .unwrap()
}

fn step(client: &mut TestClient, size: StepSize, depth: StepDepth) -> RequestID {
    client
        .send(Set::new(
            EventKind::SingleStep,
            SuspendPolicy::EventThread,
            vec![Modifier::Step(thread_id(MAIN), size, depth)],
        ))
        .unwrap()
}

fn resume(client: &mut TestClient) {
    client.send(Resume::new(thread_id(MAIN))).unwrap();
}

fn assert_stepped(composite: Composite, request: RequestID, at: Location) {
    assert_eq!(composite.suspend_policy, SuspendPolicy::EventThread);
    assert_eq!(
        composite.events,
        [Event::SingleStep(request, thread_id(MAIN), at)]
    );
}

/// Runs until the breakpoint and replaces it with a step.
fn stop_and_step(
    client: &mut TestClient,
    method: u64,
    index: u64,
    size: StepSize,
    depth: StepDepth,
) -> RequestID {
    let bp = breakpoint(client, method, index);
    client.send(virtual_machine::Resume).unwrap();

    let composite = client.recv_event();
    assert_eq!(composite.events[0].request_id(), bp);
    client
        .send(event_request::Clear::new(EventKind::Breakpoint, bp))
        .unwrap();

    let request = step(client, size, depth);
    resume(client);
    request
}

fn clear_step(client: &mut TestClient, request: RequestID) {
    client
        .send(event_request::Clear::new(EventKind::SingleStep, request))
        .unwrap();
}

#[test]
fn line_step_over_a_call() {
    let mut client = common::attach(main_calling_check).started();

    let request = stop_and_step(&mut client, M, 2, StepSize::Line, StepDepth::Over);

    // nothing inside check, and nothing back on line 10
    let composite = client.recv_event();
    assert_stepped(composite, request, location(M, 5));

    assert_eq!(client.send(FrameCount::new(thread_id(MAIN))), Ok(1));
    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn step_out_completes_in_the_caller() {
    let mut client = common::attach(main_calling_check).started();

    let request = stop_and_step(&mut client, N, 0, StepSize::Line, StepDepth::Out);

    let composite = client.recv_event();
    // one frame up, right after the call
    assert_stepped(composite, request, location(M, 4));
    assert_eq!(client.send(FrameCount::new(thread_id(MAIN))), Ok(1));

    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn step_into_stops_in_the_callee() {
    let mut client = common::attach(main_calling_check).started();

    let request = stop_and_step(&mut client, M, 3, StepSize::Line, StepDepth::Into);

    let composite = client.recv_event();
    assert_stepped(composite, request, location(N, 0));
    assert_eq!(client.send(FrameCount::new(thread_id(MAIN))), Ok(2));

    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn step_over_escapes_a_returning_method() {
    let mut client = common::attach(main_calling_check).started();

    // the last line of check, so the step completes in main
    let request = stop_and_step(&mut client, N, 1, StepSize::Line, StepDepth::Over);

    let composite = client.recv_event();
    assert_stepped(composite, request, location(M, 4));

    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn min_steps_stop_at_every_index() {
    let mut client = common::attach(main_calling_check).started();

    let request = stop_and_step(&mut client, M, 0, StepSize::Min, StepDepth::Over);

    // an uncleared step re-arms wherever the thread resumes
    for index in 1..4 {
        let composite = client.recv_event();
        assert_stepped(composite, request, location(M, index));
        resume(&mut client);
    }
    // over the call, then back in main after it
    let composite = client.recv_event();
    assert_stepped(composite, request, location(M, 4));

    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn line_steps_without_lines_are_minimal() {
    let mut client = common::attach(|interpreter| {
        interpreter.call(O, None);
        interpreter.run(0..3);
        interpreter.ret(Some(Value::Int(3)));
    })
    .started();

    let request = stop_and_step(&mut client, O, 0, StepSize::Line, StepDepth::Over);

    let composite = client.recv_event();
    assert_stepped(composite, request, location(O, 1));

    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn loop_back_edges_complete_a_line_step() {
    let mut client = common::attach(|interpreter| {
        interpreter.call(M, None);
        // line 11 jumps back to line 9
        interpreter.run([0, 1, 2, 5, 6, 0, 1]);
        interpreter.ret(None);
    })
    .started();

    let request = stop_and_step(&mut client, M, 5, StepSize::Line, StepDepth::Over);

    let composite = client.recv_event();
    assert_stepped(composite, request, location(M, 0));

    clear_step(&mut client, request);
    resume(&mut client);
    client.finish();
}

#[test]
fn steps_for_other_threads_never_fire() {
    let mut client = common::attach(main_calling_check).started();

    client
        .send(Set::new(
            EventKind::SingleStep,
            SuspendPolicy::All,
            vec![Modifier::Step(
                thread_id(common::WORKER),
                StepSize::Min,
                StepDepth::Into,
            )],
        ))
        .unwrap();
    client.send(virtual_machine::Resume).unwrap();

    client.finish();
}

#[test]
fn steps_need_a_known_thread() {
    let mut client = common::attach(|_| {}).started();

    let result = client.send(Set::new(
        EventKind::SingleStep,
        SuspendPolicy::All,
        vec![Modifier::Step(thread_id(77), StepSize::Line, StepDepth::Over)],
    ));
    assert_eq!(result, Err(ErrorCode::InvalidThread));

    let result = client.send(Set::new(EventKind::SingleStep, SuspendPolicy::All, vec![]));
    assert_eq!(result, Err(ErrorCode::IllegalArgument));

    client.send(virtual_machine::Resume).unwrap();
    client.finish();
}
