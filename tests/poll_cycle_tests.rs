//! Poll cycle behavior over an in-memory mailbox.

use mailsignal::application::CycleOutcome;
use mailsignal::domain::Signal;
use mailsignal::port::Event;
use mailsignal::testkit::email;
use mailsignal::testkit::fixture::RelayFixture;

#[tokio::test]
async fn newest_signal_wins_and_the_rest_are_flagged() {
    let fx = RelayFixture::new(10);
    let sell = fx.alert("Alert: SELL NOW");
    let invalid = fx.alert("nothing to see");
    let buy = fx.alert("Alert: BUY NOW");
    let mut state = fx.state();

    let outcome = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Delivered {
            id: buy,
            signal: Signal::Buy,
            discarded: 2
        }
    );
    assert_eq!(fx.delivery.delivered(), vec![Signal::Buy]);
    assert!(fx.mailbox.is_seen(sell));
    assert!(fx.mailbox.is_seen(invalid));
    assert!(fx.mailbox.is_seen(buy));
    assert_eq!(state.daily_count(), 1);
    assert_eq!(state.sent().len(), 1);
    assert_eq!(
        fx.events
            .count(|e| matches!(e, Event::BatchDetected { count: 3 })),
        1
    );
}

#[tokio::test]
async fn at_most_one_delivery_per_cycle() {
    let fx = RelayFixture::new(10);
    for body in ["BUY", "SELL", "BUY", "SELL"] {
        fx.alert(body);
    }
    let mut state = fx.state();

    fx.relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert_eq!(fx.delivery.delivered(), vec![Signal::Sell]);
    assert!(fx.mailbox.unseen().is_empty());
}

#[tokio::test]
async fn older_messages_are_never_fetched_once_a_signal_is_found() {
    let fx = RelayFixture::new(10);
    let old = fx.alert("BUY");
    let new = fx.alert("SELL");
    let mut state = fx.state();

    fx.relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert_eq!(fx.mailbox.fetched(), vec![new]);
    assert!(fx.mailbox.is_seen(old));
}

#[tokio::test]
async fn no_signal_flags_everything_and_delivers_nothing() {
    let fx = RelayFixture::new(10);
    let a = fx.alert("hello");
    let b = fx
        .mailbox
        .deliver(mailsignal::testkit::SENDER, email::html_only("<b>BUY</b>"), fx.today());
    let mut state = fx.state();

    let outcome = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert_eq!(outcome, CycleOutcome::NoSignal { discarded: 2 });
    assert!(fx.delivery.delivered().is_empty());
    assert!(fx.mailbox.is_seen(a));
    assert!(fx.mailbox.is_seen(b));
    assert_eq!(
        fx.events
            .count(|e| matches!(e, Event::ExtractionFailed { id, .. } if *id == b)),
        1
    );
}

#[tokio::test]
async fn multipart_alert_uses_its_plain_text_part() {
    let fx = RelayFixture::new(10);
    let id = fx.mailbox.deliver(
        mailsignal::testkit::SENDER,
        email::multipart("SELL signal", "<p>BUY</p>"),
        fx.today(),
    );
    let mut state = fx.state();

    let outcome = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Delivered {
            id,
            signal: Signal::Sell,
            discarded: 0
        }
    );
}

#[tokio::test]
async fn failed_delivery_is_retried_next_cycle() {
    let fx = RelayFixture::new(10);
    let old = fx.alert("SELL");
    let buy = fx.alert("BUY");
    fx.delivery.respond(503, "bot restarting");
    let mut state = fx.state();

    let first = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();
    assert_eq!(
        first,
        CycleOutcome::DeliveryFailed {
            id: buy,
            signal: Signal::Buy,
            discarded: 1,
            reason: "HTTP 503: bot restarting".to_string(),
        }
    );
    assert!(fx.mailbox.is_seen(old));
    assert!(!fx.mailbox.is_seen(buy));
    assert_eq!(state.daily_count(), 0);

    let second = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();
    assert_eq!(second.delivered(), Some(Signal::Buy));
    assert!(fx.mailbox.is_seen(buy));
    assert_eq!(fx.delivery.delivered(), vec![Signal::Buy, Signal::Buy]);
    assert_eq!(state.daily_count(), 1);
}

#[tokio::test]
async fn transport_error_leaves_message_unread() {
    let fx = RelayFixture::new(10);
    let buy = fx.alert("BUY");
    fx.delivery.fail("connection refused");
    let mut state = fx.state();

    let outcome = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert!(matches!(outcome, CycleOutcome::DeliveryFailed { .. }));
    assert_eq!(fx.mailbox.unseen(), vec![buy]);
    assert_eq!(state.alerts().len(), 1);
}

#[tokio::test]
async fn flagged_message_does_not_resurface() {
    let fx = RelayFixture::new(10);
    fx.alert("BUY");
    let mut state = fx.state();

    fx.relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();
    let again = fx
        .relay
        .run_cycle(&mut fx.session(), &mut state)
        .await
        .unwrap();

    assert_eq!(again, CycleOutcome::Idle);
    assert_eq!(fx.delivery.delivered().len(), 1);
}

#[tokio::test]
async fn probe_failure_is_a_connection_fault() {
    let fx = RelayFixture::new(10);
    let buy = fx.alert("BUY");
    fx.mailbox.fail_next_probes(1);
    let mut state = fx.state();

    let result = fx.relay.run_cycle(&mut fx.session(), &mut state).await;

    assert!(result.is_err());
    assert!(fx.mailbox.flagged().is_empty());
    assert!(fx.delivery.delivered().is_empty());
    assert_eq!(fx.mailbox.unseen(), vec![buy]);
}
