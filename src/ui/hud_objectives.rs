//! UI domain: objective checklist.

use bevy::prelude::*;

use crate::objectives::ObjectiveTracker;

#[derive(Component)]
pub struct ObjectiveListText;

pub(crate) fn spawn_objectives_ui(mut commands: Commands) {
    commands.spawn((
        ObjectiveListText,
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.85, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(16.0),
            top: Val::Px(16.0),
            ..default()
        },
    ));
}

pub(crate) fn update_objectives_ui(
    tracker: Res<ObjectiveTracker>,
    mut text_query: Query<&mut Text, With<ObjectiveListText>>,
) {
    if !tracker.is_changed() {
        return;
    }

    let lines: Vec<String> = tracker.objectives().iter().map(|o| o.hud_line()).collect();
    for mut text in &mut text_query {
        text.0 = format!("Objectives\n{}", lines.join("\n"));
    }
}
