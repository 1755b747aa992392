//! Common test fixtures for coordinate-operation tests.

/// Geographic sample points as (longitude, latitude) in degrees.
pub mod points {
    /// Paris, Panthéon.
    pub const PARIS: (f64, f64) = (2.345_833, 48.846_111);

    /// Brest, near the western edge of the France grid.
    pub const BREST: (f64, f64) = (-4.486_1, 48.390_4);

    /// Strasbourg, near the eastern edge of the France grid.
    pub const STRASBOURG: (f64, f64) = (7.752_1, 48.573_4);

    /// Outside every test grid.
    pub const SYDNEY: (f64, f64) = (151.209_3, -33.868_8);
}

/// Ellipsoid semi-axes (semi_major, semi_minor) in metres.
pub mod ellipsoids {
    pub const WGS84: (f64, f64) = (6378137.0, 6356752.314245179);

    pub const GRS80: (f64, f64) = (6378137.0, 6356752.314140356);

    pub const CLARKE_1880_IGN: (f64, f64) = (6378249.2, 6356515.0);

    pub const INTERNATIONAL_1924: (f64, f64) = (6378388.0, 6356911.946127946);
}

/// Published seven-parameter transformations.
pub mod bursa_wolf {
    /// WGS 72 to WGS 84, EPSG:1238 (Position Vector).
    /// Order: dx, dy, dz (m), ex, ey, ez (arc-seconds), ppm.
    pub const WGS72_TO_WGS84: [f64; 7] = [0.0, 0.0, 4.5, 0.0, 0.0, 0.554, 0.219];

    /// ETRS89 to OSGB36 (Position Vector), nonzero on every term.
    pub const ETRS89_TO_OSGB36: [f64; 7] = [-446.448, 125.157, -542.060, -0.1502, -0.2470, -0.8421, 20.4894];

    /// Parameter names in the order of the arrays above.
    pub const NAMES: [&str; 7] = ["dx", "dy", "dz", "ex", "ey", "ez", "ppm"];
}
