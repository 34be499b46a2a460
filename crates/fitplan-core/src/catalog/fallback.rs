//! Sample exercises served when the remote catalog is unavailable.

use crate::model::ExerciseRecord;

/// The fixed eight-exercise sample set.
pub fn fallback_exercises() -> Vec<ExerciseRecord> {
    vec![
        sample(
            "Push-ups",
            "strength",
            "chest",
            "body weight",
            "beginner",
            "Start in plank position. Lower your body until chest nearly touches floor. \
             Push back up to starting position.",
        ),
        sample(
            "Squats",
            "strength",
            "quadriceps",
            "body weight",
            "beginner",
            "Stand with feet shoulder-width apart. Lower your body as if sitting in a chair. \
             Return to standing position.",
        ),
        sample(
            "Plank",
            "strength",
            "abdominals",
            "body weight",
            "beginner",
            "Hold your body in a straight line, supported on forearms and toes. Keep core tight.",
        ),
        sample(
            "Lunges",
            "strength",
            "quadriceps",
            "body weight",
            "intermediate",
            "Step forward with one leg, lowering hips until both knees are bent at 90 degrees. \
             Push back to start.",
        ),
        sample(
            "Pull-ups",
            "strength",
            "lats",
            "pull-up bar",
            "intermediate",
            "Hang from bar with palms facing away. Pull body up until chin clears bar. \
             Lower with control.",
        ),
        sample(
            "Burpees",
            "cardio",
            "full body",
            "body weight",
            "intermediate",
            "Squat down, jump back to plank, do push-up, jump feet forward, \
             jump up with arms overhead.",
        ),
        sample(
            "Deadlifts",
            "strength",
            "hamstrings",
            "barbell",
            "expert",
            "Stand with feet hip-width apart. Hinge at hips, keeping back straight. \
             Lift weight by extending hips and knees.",
        ),
        sample(
            "Bench Press",
            "strength",
            "chest",
            "barbell",
            "intermediate",
            "Lie on bench, lower barbell to chest, press up until arms are fully extended.",
        ),
    ]
}

fn sample(
    name: &str,
    kind: &str,
    muscle: &str,
    equipment: &str,
    difficulty: &str,
    instructions: &str,
) -> ExerciseRecord {
    ExerciseRecord::named(name)
        .with_kind(kind)
        .with_muscle(muscle)
        .with_equipment(equipment)
        .with_difficulty(difficulty)
        .with_instructions(instructions)
}
