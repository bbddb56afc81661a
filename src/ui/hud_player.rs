//! UI domain: player HUD health and blood bars.

use bevy::prelude::*;

use crate::blood::BloodMeter;
use crate::combat::Health;
use crate::content::CombatDefaults;
use crate::movement::Player;

pub(crate) const PLAYER_BAR_WIDTH: f32 = 200.0;
pub(crate) const PLAYER_BAR_HEIGHT: f32 = 18.0;
pub(crate) const PLAYER_BAR_PADDING: f32 = 16.0;
const BAR_GAP: f32 = 8.0;

/// Marker for the player's health bar fill element
#[derive(Component)]
pub struct PlayerHealthBarFill;

/// Marker for the blood meter fill element
#[derive(Component)]
pub struct BloodBarFill;

/// Text under the blood bar naming the current band
#[derive(Component)]
pub struct BloodBandLabel;

fn spawn_bar(commands: &mut Commands, top: f32, fill_color: Color, fill: impl Bundle) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(PLAYER_BAR_PADDING),
                top: Val::Px(top),
                width: Val::Px(PLAYER_BAR_WIDTH),
                height: Val::Px(PLAYER_BAR_HEIGHT),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.8)),
            BorderColor::all(Color::srgb(0.3, 0.3, 0.3)),
        ))
        .with_children(|parent| {
            parent.spawn((
                fill,
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(fill_color),
            ));
        });
}

pub(crate) fn spawn_player_hud(mut commands: Commands) {
    let blood_top = PLAYER_BAR_PADDING + PLAYER_BAR_HEIGHT + BAR_GAP;

    spawn_bar(
        &mut commands,
        PLAYER_BAR_PADDING,
        Color::srgb(0.2, 0.8, 0.3),
        PlayerHealthBarFill,
    );
    spawn_bar(
        &mut commands,
        blood_top,
        Color::srgb(0.6, 0.05, 0.1),
        BloodBarFill,
    );

    commands.spawn((
        BloodBandLabel,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.8, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(PLAYER_BAR_PADDING),
            top: Val::Px(blood_top + PLAYER_BAR_HEIGHT + 4.0),
            ..default()
        },
    ));
}

pub(crate) fn update_player_healthbar(
    player_query: Query<&Health, With<Player>>,
    mut fill_query: Query<(&mut Node, &mut BackgroundColor), With<PlayerHealthBarFill>>,
) {
    let Ok(health) = player_query.single() else {
        return;
    };

    for (mut node, mut bg_color) in &mut fill_query {
        let percent = health.percent();
        node.width = Val::Percent(percent * 100.0);

        // Color gradient: green -> yellow -> red
        let color = if percent > 0.5 {
            let t = (percent - 0.5) * 2.0;
            Color::srgb(1.0 - t * 0.8, 0.8, 0.3 * (1.0 - t))
        } else {
            let t = percent * 2.0;
            Color::srgb(0.9, 0.2 + t * 0.6, 0.2)
        };
        bg_color.0 = color;
    }
}

pub(crate) fn update_blood_bar(
    defaults: Res<CombatDefaults>,
    player_query: Query<&BloodMeter, With<Player>>,
    mut fill_query: Query<&mut Node, With<BloodBarFill>>,
    mut label_query: Query<&mut Text, With<BloodBandLabel>>,
) {
    let Ok(meter) = player_query.single() else {
        return;
    };

    for mut node in &mut fill_query {
        node.width = Val::Percent(meter.fraction() * 100.0);
    }

    let band = meter.band(&defaults.blood);
    let modifier = meter.damage_modifier(&defaults.blood);
    for mut text in &mut label_query {
        let label = format!("{}  x{:.2} damage", band.label(), modifier);
        if text.0 != label {
            text.0 = label;
        }
    }
}
