diesel::table! {
    availability (date, period, slot) {
        date -> Date,
        period -> Text,
        slot -> Text,
        available -> Bool,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        date -> Date,
        period -> Text,
        slot -> Text,
        ticket -> Text,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        email -> Text,
        password -> Text,
        role -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(appointments, availability, users);
