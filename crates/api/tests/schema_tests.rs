mod common;

use common::test_schema;

#[tokio::test]
async fn academic_years_query_returns_six_descending() {
    let schema = test_schema();

    let response = schema.execute("{ academicYears currentAcademicYear }").await;
    assert!(
        response.errors.is_empty(),
        "query should succeed: {:?}",
        response.errors
    );

    let data = response.data.into_json().unwrap();
    let years: Vec<i64> = data["academicYears"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();

    assert_eq!(years.len(), 6);
    assert!(years.windows(2).all(|w| w[0] == w[1] + 1));
    assert_eq!(years[0], data["currentAcademicYear"].as_i64().unwrap());
}

#[tokio::test]
async fn sdl_exposes_membership_and_dashboard_operations() {
    let schema = test_schema();
    let sdl = schema.sdl();

    for op in [
        "assignStudentsToClub",
        "removeStudentsFromClub",
        "changeStudentsClub",
        "competitionResults",
        "resultsCsv",
        "saveCompetitionResult",
        "requestSignboard",
        "searchStudents",
    ] {
        assert!(sdl.contains(op), "SDL should expose {op}");
    }
}

#[tokio::test]
async fn assign_rejects_a_blank_target_club() {
    let schema = test_schema();

    let mutation = r#"
        mutation {
            assignStudentsToClub(
                studentIds: ["00000000-0000-0000-0000-000000000001"],
                targetClub: "   "
            ) { assigned skipped }
        }
    "#;
    let response = schema.execute(mutation).await;

    assert!(!response.errors.is_empty());
    assert!(response.errors[0]
        .message
        .contains("club name must not be empty"));
}

#[tokio::test]
async fn assign_rejects_an_empty_student_selection() {
    let schema = test_schema();

    let mutation = r#"
        mutation {
            assignStudentsToClub(studentIds: [], targetClub: "卓球部") {
                assigned
                skipped
            }
        }
    "#;
    let response = schema.execute(mutation).await;

    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("no students selected"));
}

#[tokio::test]
async fn individual_results_need_at_least_one_entry() {
    let schema = test_schema();

    let mutation = r#"
        mutation {
            saveCompetitionResult(input: {
                clubName: "卓球部",
                division: INDIVIDUAL,
                entries: []
            }) { id }
        }
    "#;
    let response = schema.execute(mutation).await;

    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("at least one entry"));
}
