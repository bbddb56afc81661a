//! UI domain: withdrawal vignette overlay.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::blood::{BloodBandChanged, BloodMeter};
use crate::content::CombatDefaults;
use crate::movement::Player;

/// Alpha approaches its target at this rate per second
const FADE_RATE: f32 = 1.5;

/// Full-screen red tint whose strength follows the blood band
#[derive(Component, Debug, Default)]
pub struct BloodVignette {
    pub target_alpha: f32,
}

pub(crate) fn spawn_vignette(mut commands: Commands) {
    commands.spawn((
        BloodVignette::default(),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            top: Val::Px(0.0),
            bottom: Val::Px(0.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.45, 0.0, 0.02, 0.0)),
        // Above the world, below the HUD text
        ZIndex(-1),
    ));
}

pub(crate) fn retarget_vignette(
    mut band_events: MessageReader<BloodBandChanged>,
    defaults: Res<CombatDefaults>,
    players: Query<(), (With<Player>, With<BloodMeter>)>,
    mut vignettes: Query<&mut BloodVignette>,
) {
    for event in band_events.read() {
        if !players.contains(event.entity) {
            continue;
        }
        for mut vignette in &mut vignettes {
            vignette.target_alpha = defaults.blood.vignette.get(event.to);
        }
    }
}

pub(crate) fn fade_vignette(
    time: Res<Time>,
    mut vignettes: Query<(&BloodVignette, &mut BackgroundColor)>,
) {
    let step = FADE_RATE * time.delta_secs();
    for (vignette, mut color) in &mut vignettes {
        let alpha = color.0.alpha();
        let next = if alpha < vignette.target_alpha {
            (alpha + step).min(vignette.target_alpha)
        } else {
            (alpha - step).max(vignette.target_alpha)
        };
        if next != alpha {
            color.0.set_alpha(next);
        }
    }
}

pub(crate) fn reset_vignette(mut vignettes: Query<(&mut BloodVignette, &mut BackgroundColor)>) {
    for (mut vignette, mut color) in &mut vignettes {
        vignette.target_alpha = 0.0;
        color.0.set_alpha(0.0);
    }
}
