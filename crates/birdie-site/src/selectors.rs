//! Fallback selector tables for the booking widget.
//!
//! Each function returns the selectors in preference order; the widget's
//! markup has shifted between releases, so every target keeps at least one
//! fallback.

use birdie_browser::Selector;

pub fn members_tab() -> Vec<Selector> {
    vec![
        Selector::css("li.widget-auth-tab--member"),
        Selector::css("li.booking-widget-login"),
    ]
}

pub fn email_field() -> Vec<Selector> {
    vec![
        Selector::css("#email"),
        Selector::css("input[name='email']"),
        Selector::css("input[type='email']"),
    ]
}

pub fn password_field() -> Vec<Selector> {
    vec![
        Selector::css("#password"),
        Selector::css("input[name='password']"),
        Selector::css("input[type='password']"),
    ]
}

pub fn login_button() -> Vec<Selector> {
    vec![
        Selector::css("input.fl-button-primary[type='submit'][value='Log in']"),
        Selector::css("input[type='submit']"),
    ]
}

/// The logout link only renders for an authenticated member; its presence
/// is the proof that login worked.
pub fn logout_link() -> Vec<Selector> {
    vec![
        Selector::css("a.widget-auth-tab--logout"),
        Selector::css("a.widget-link.icon-exit"),
        Selector::css("[qa-class='widget-auth-tab--logout']"),
    ]
}

pub fn month_title() -> Vec<Selector> {
    vec![Selector::css(
        "button.btn.btn-default.btn-sm.uib-title strong",
    )]
}

pub fn month_next_button() -> Vec<Selector> {
    vec![Selector::css(
        "button.btn.btn-default.btn-sm[ng-click*='move(1)']",
    )]
}

/// Day cell in the calendar; muted cells belong to adjacent months.
pub fn day_button(day: u32) -> Vec<Selector> {
    vec![Selector::text(
        "button.btn.btn-default.btn-sm span:not(.text-muted)",
        format!("{:02}", day),
    )]
}

pub fn player_button(players: u32) -> Vec<Selector> {
    vec![
        Selector::text(
            "a.toggler-heading[ng-model='step.nbPlayers']",
            players.to_string(),
        ),
        Selector::text("a[ng-model='step.nbPlayers']", players.to_string()),
    ]
}

pub fn continue_button() -> Vec<Selector> {
    vec![
        Selector::css("button.fl-button-primary[ng-click*='continue']"),
        Selector::text("button.fl-button-primary", "Continue".to_string()),
    ]
}

pub fn slot_containers() -> Vec<Selector> {
    vec![Selector::css("div.widget-teetime")]
}

pub fn final_continue_button() -> Vec<Selector> {
    vec![
        Selector::css("button.fl-button.fl-button-primary[ng-click='confirmStep()']"),
        Selector::css("button.fl-button-block.fl-button-primary"),
        Selector::text("button.fl-button-primary", "Continue".to_string()),
    ]
}

pub fn terms_checkbox() -> Vec<Selector> {
    vec![
        Selector::css("input[ng-model='vm.acceptTermsAndConditions'][type='checkbox']"),
        Selector::css("input.fl-checkbox-input[ng-required='true']"),
        Selector::css("input[type='checkbox'][required]"),
    ]
}

pub fn confirm_button() -> Vec<Selector> {
    vec![
        Selector::css("button.fl-button-primary[type='submit']"),
        Selector::css("button.fl-button-primary.fl-button-block"),
        Selector::text("button.fl-button-primary", "Confirm".to_string()),
    ]
}
