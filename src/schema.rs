diesel::table! {
    advisors (id) {
        id -> Uuid,
        user_id -> Uuid,
        department -> Text,
        designation -> Text,
        consultation_hours_start -> Nullable<Time>,
        consultation_hours_end -> Nullable<Time>,
        available_days -> Text,
        bio -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        student_id -> Uuid,
        advisor_id -> Uuid,
        appointment_date -> Date,
        appointment_time -> Time,
        issue_category -> Text,
        issue_description -> Text,
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    feedback (id) {
        id -> Uuid,
        appointment_id -> Uuid,
        student_id -> Uuid,
        advisor_id -> Uuid,
        rating -> Int2,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        appointment_id -> Nullable<Uuid>,
        title -> Text,
        message -> Text,
        kind -> Text,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_logins (token) {
        token -> Text,
        user_id -> Uuid,
        login_time -> Timestamptz,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        password -> Text,
        role -> Text,
        first_name -> Text,
        last_name -> Text,
        phone_number -> Nullable<Text>,
        push_token -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(advisors -> users (user_id));
diesel::joinable!(appointments -> advisors (advisor_id));
diesel::joinable!(appointments -> users (student_id));
diesel::joinable!(feedback -> appointments (appointment_id));
diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(user_logins -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    advisors,
    appointments,
    feedback,
    notifications,
    user_logins,
    users,
);
