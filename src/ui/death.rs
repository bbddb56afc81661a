//! UI domain: end-of-attempt summary and retry.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::blood::{BloodBand, BloodMeter};
use crate::combat::{DeathEvent, KillCounter};
use crate::core::{ArenaScoped, GameState, RunConfig};
use crate::movement::Player;
use crate::objectives::ObjectiveTracker;

const PANEL_COLOR: Color = Color::srgba(0.08, 0.02, 0.03, 0.92);
const TITLE_COLOR: Color = Color::srgb(0.85, 0.12, 0.12);
const LINE_COLOR: Color = Color::srgb(0.75, 0.7, 0.7);
const HINT_COLOR: Color = Color::srgb(0.45, 0.4, 0.42);

/// Root of the summary panel. Arena scoped, so a retry clears it.
#[derive(Component, Debug)]
pub struct AttemptSummaryPanel;

/// What the player achieved before dying
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptSummary {
    pub attempt: u32,
    pub enemies_defeated: u32,
    pub objectives_done: usize,
    pub objectives_total: usize,
    pub final_band: BloodBand,
}

impl AttemptSummary {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Attempt {}", self.attempt),
            format!("Enemies defeated: {}", self.enemies_defeated),
            format!(
                "Objectives: {}/{}",
                self.objectives_done, self.objectives_total
            ),
            format!("Blood: {}", self.final_band.label()),
        ]
    }
}

fn label(text: impl Into<String>, size: f32, color: Color, gap: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(gap)),
            ..default()
        },
    )
}

fn spawn_summary_panel(commands: &mut Commands, summary: &AttemptSummary) {
    let panel = commands
        .spawn((
            AttemptSummaryPanel,
            ArenaScoped,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ZIndex(100),
        ))
        .id();

    let card = commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(32.0)),
                ..default()
            },
            BackgroundColor(PANEL_COLOR),
            ChildOf(panel),
        ))
        .id();

    commands.spawn((label("BLED OUT", 56.0, TITLE_COLOR, 24.0), ChildOf(card)));
    for line in summary.lines() {
        commands.spawn((label(line, 18.0, LINE_COLOR, 6.0), ChildOf(card)));
    }
    commands.spawn((
        label("[R] or [Enter] to try again", 14.0, HINT_COLOR, 0.0),
        ChildOf(card),
    ));
}

/// Show the summary when the player's death comes through.
pub(crate) fn show_attempt_summary(
    mut commands: Commands,
    mut death_events: MessageReader<DeathEvent>,
    run_config: Res<RunConfig>,
    kills: Res<KillCounter>,
    tracker: Res<ObjectiveTracker>,
    players: Query<Option<&BloodMeter>, With<Player>>,
    panels: Query<(), With<AttemptSummaryPanel>>,
) {
    let Some(meter) = death_events
        .read()
        .find_map(|event| players.get(event.entity).ok())
    else {
        return;
    };
    if !panels.is_empty() {
        return;
    }

    let summary = AttemptSummary {
        attempt: run_config.attempt,
        enemies_defeated: kills.enemies,
        objectives_done: tracker.completed_count(),
        objectives_total: tracker.objectives().len(),
        final_band: meter.map(BloodMeter::reported_band).unwrap_or_default(),
    };
    info!(
        "Attempt {} over: {} enemies, {}/{} objectives",
        summary.attempt, summary.enemies_defeated, summary.objectives_done, summary.objectives_total
    );
    spawn_summary_panel(&mut commands, &summary);
}

pub(crate) fn retry_attempt(
    keyboard: Res<ButtonInput<KeyCode>>,
    panels: Query<(), With<AttemptSummaryPanel>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if panels.is_empty() {
        return;
    }
    if keyboard.any_just_pressed([KeyCode::KeyR, KeyCode::Enter, KeyCode::NumpadEnter]) {
        next_state.set(GameState::Loading);
    }
}
