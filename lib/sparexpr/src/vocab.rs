//! Vocabularies used by the expression engine beyond the XSD constants
//! already provided by `oxrdf`.

pub mod owl {
    //! [OWL 2](https://www.w3.org/TR/owl2-syntax/) datatype vocabulary.

    use oxrdf::NamedNodeRef;

    /// The `owl:rational` datatype, whose lexical space is fractions like `1/3`.
    pub const RATIONAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#rational");
}

pub mod geosparql {
    //! [GeoSPARQL](https://opengeospatial.github.io/ogc-geosparql/) serialization vocabulary.

    use oxrdf::NamedNodeRef;

    /// Well-Known Text serialization of a geometry.
    pub const WKT_LITERAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#wktLiteral");
    /// GML serialization of a geometry. Recognized but never coerced to WKT.
    pub const GML_LITERAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#gmlLiteral");
    /// GeoJSON serialization of a geometry.
    pub const GEO_JSON_LITERAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#geoJSONLiteral");
}

pub mod geof {
    //! [GeoSPARQL](https://opengeospatial.github.io/ogc-geosparql/) functions vocabulary.

    use oxrdf::NamedNodeRef;

    pub const DIMENSION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/def/function/geosparql/dimension");
    pub const ENVELOPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/def/function/geosparql/envelope");
    pub const GEOMETRY_TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/def/function/geosparql/geometryType");
    pub const IS_EMPTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/def/function/geosparql/isEmpty");
}

pub mod sf {
    //! [Simple Features](https://www.opengis.net/ont/sf) geometry classes.

    use oxrdf::NamedNodeRef;

    pub const POINT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#Point");
    pub const LINE_STRING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#LineString");
    pub const POLYGON: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#Polygon");
    pub const MULTI_POINT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#MultiPoint");
    pub const MULTI_LINE_STRING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#MultiLineString");
    pub const MULTI_POLYGON: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#MultiPolygon");
    pub const GEOMETRY_COLLECTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/sf#GeometryCollection");
}
