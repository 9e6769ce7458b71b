diesel::table! {
    appointments (id) {
        id -> Uuid,
        provider_id -> Uuid,
        client_id -> Uuid,
        date -> Date,
        time -> Time,
        duration_minutes -> Int4,
        status -> Text,
        service -> Nullable<Text>,
        price -> Nullable<Float8>,
        version -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    schedules (provider_id) {
        provider_id -> Uuid,
        document -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(appointments, schedules);
