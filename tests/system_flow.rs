//! End-to-end flows across module boundaries, on the host with the
//! simulated link and a virtual clock.

// Host critical-section implementation for the embassy-sync primitives.
use critical_section as _;

use netbeacon::adapters::wifi::SimLink;
use netbeacon::channels::{BUTTON_EVENTS, MODE_MAILBOX, EventQueue};
use netbeacon::config::Credentials;
use netbeacon::dispatcher;
use netbeacon::drivers::button::{self, ButtonClassifier, ButtonEvent};
use netbeacon::drivers::indicator::IndicatorMode;
use netbeacon::supervisor::{LinkState, LinkSupervisor};

fn creds() -> Credentials {
    Credentials::new("FlowNet", "password1").unwrap()
}

/// Edge stream → classifier → shared queue → dispatcher description,
/// through the same ISR entry point the hardware uses.
#[test]
fn button_session_reaches_the_dispatcher() {
    // Double-click then a long press, with one bounce on the first press.
    let edges = [
        (true, 1_000u32),
        (false, 1_005), // bounce, 5ms
        (true, 1_010),
        (false, 1_110), // click, 100ms
        (true, 1_400),
        (false, 1_480), // click, 80ms
        (true, 2_000),
        (false, 2_800), // long click, 800ms
    ];
    for (pressed, at_ms) in edges {
        button::button_isr_handler(pressed, at_ms);
    }

    let mut reports = Vec::new();
    while let Some(event) = BUTTON_EVENTS.try_receive() {
        reports.push(dispatcher::describe(event));
    }
    assert_eq!(
        reports,
        vec![
            "pressed", "released", "pressed", "clicked", "pressed", "clicked", "pressed",
            "long clicked",
        ]
    );
}

/// A hammered queue drops the overflow but keeps arrival order for
/// everything it accepted.
#[test]
fn event_burst_overflow_drops_only_the_tail() {
    let queue = EventQueue::new();
    let classifier = ButtonClassifier::new();

    // 40 rapid press/release pairs = 80 events against a depth of 32.
    let mut produced = Vec::new();
    for i in 0..40u32 {
        let t = i * 200;
        for (pressed, at_ms) in [(true, t), (false, t + 100)] {
            let event = classifier.on_edge(pressed, at_ms);
            produced.push((event, queue.send_from_isr(event)));
        }
    }

    let accepted: Vec<ButtonEvent> = produced
        .iter()
        .filter(|(_, sent)| *sent)
        .map(|(e, _)| *e)
        .collect();
    assert_eq!(accepted.len(), 32);

    let mut drained = Vec::new();
    while let Some(event) = queue.try_receive() {
        drained.push(event);
    }
    assert_eq!(drained, accepted);
}

/// Full connect / lose / reconnect cycle against the shared mailbox:
/// the indicator would observe exactly the latest mode at each stage.
#[test]
fn supervisor_signals_the_indicator_through_the_mailbox() {
    let mut sup = LinkSupervisor::new(SimLink::connects_after(0), &MODE_MAILBOX, creds());

    // Attempt starts: connecting blink requested.
    let mut t = sup.step(0);
    assert_eq!(MODE_MAILBOX.try_take(), Some(IndicatorMode::Blink4Hz));

    // Link is up on the first poll: heartbeat blink requested.
    t += sup.step(t);
    assert_eq!(sup.state(), LinkState::Connected);
    assert_eq!(MODE_MAILBOX.try_take(), Some(IndicatorMode::Blink1Hz));

    // Link drops: the cycle restarts and overwrites any unread mode.
    sup.link_mut().sever();
    t += sup.step(t); // Connected -> Disconnected
    t += sup.step(t); // Disconnected -> Connecting (pushes Blink4Hz)
    let _ = t;
    assert_eq!(MODE_MAILBOX.try_take(), Some(IndicatorMode::Blink4Hz));
    assert_eq!(MODE_MAILBOX.try_take(), None);
}

/// Unreachable network: the supervisor cycles attempt → backoff →
/// attempt forever without ever reporting connected.
#[test]
fn unreachable_network_retries_forever() {
    struct NullModes;
    impl netbeacon::supervisor::ModePort for NullModes {
        fn set_mode(
            &self,
            _mode: IndicatorMode,
        ) -> Result<(), netbeacon::supervisor::ModeSetError> {
            Ok(())
        }
    }

    let modes = NullModes;
    let mut sup = LinkSupervisor::new(SimLink::unreachable(), &modes, creds());
    let mut t = 0u32;
    let mut attempts = 0u32;
    // Ten minutes of virtual time.
    while t < 600_000 {
        if matches!(sup.state(), LinkState::Disconnected) {
            attempts += 1;
        }
        let delay = sup.step(t);
        assert_ne!(sup.state(), LinkState::Connected);
        t += delay.max(1);
    }
    // 30s attempt + 30s backoff = one attempt per minute.
    assert_eq!(attempts, 10);
    assert_eq!(sup.link_ref().begin_calls(), 10);
}
