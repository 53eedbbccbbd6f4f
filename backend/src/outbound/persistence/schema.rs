//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        #[max_length = 32]
        username -> Varchar,
        password_hash -> Varchar,
        #[max_length = 16]
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rides. `driver_id` is null exactly when `status` is `REQUESTED`.
    rides (id) {
        id -> Uuid,
        user_id -> Uuid,
        driver_id -> Nullable<Uuid>,
        pickup_location -> Varchar,
        drop_location -> Varchar,
        distance_km -> Float8,
        fare -> Float8,
        #[max_length = 16]
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, rides);
