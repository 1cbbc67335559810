pub const SCHEMA: &str = r#"

CREATE TABLE IF NOT EXISTS nodes (
    id BIGSERIAL PRIMARY KEY,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    UNIQUE (latitude, longitude)
);

CREATE TABLE IF NOT EXISTS routes (
    id BIGSERIAL PRIMARY KEY,
    start_latitude DOUBLE PRECISION NOT NULL,
    start_longitude DOUBLE PRECISION NOT NULL,
    end_latitude DOUBLE PRECISION NOT NULL,
    end_longitude DOUBLE PRECISION NOT NULL,
    rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5)
);

CREATE TABLE IF NOT EXISTS route_way (
    route_id BIGINT NOT NULL REFERENCES routes (id),
    node_id BIGINT NOT NULL REFERENCES nodes (id),
    sequence INTEGER NOT NULL,
    UNIQUE (route_id, node_id),
    UNIQUE (route_id, sequence)
);

CREATE TABLE IF NOT EXISTS edges (
    node_id_start BIGINT NOT NULL REFERENCES nodes (id),
    node_id_end BIGINT NOT NULL REFERENCES nodes (id),
    weight DOUBLE PRECISION NOT NULL,
    usage_count BIGINT NOT NULL CHECK (usage_count > 0),
    PRIMARY KEY (node_id_start, node_id_end),
    CHECK (node_id_start <> node_id_end)
);

"#;
