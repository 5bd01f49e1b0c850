//! GraphQL documents for the Strapi v4 content API.
//!
//! The CMS schema is tenant-specific, so documents are hand-written
//! constants rather than codegen. Every root field is aliased to `entry`
//! (single) or `entries` (collection) so one serde response shape covers
//! all entity kinds.

/// Parameter type by its natural key (the name text).
pub const PARAMETER_TYPE_BY_NAME: &str = r"
query ParameterTypeByName($name: String!, $locale: I18NLocaleCode!) {
  entries: parameterTypes(filters: { name: { eq: $name } }, locale: $locale) {
    data {
      id
      attributes {
        name
        slug
        localizations { data { id attributes { locale } } }
      }
    }
  }
}
";

/// Parameter type by id, with its localization peers.
pub const PARAMETER_TYPE_BY_ID: &str = r"
query ParameterTypeById($id: ID!, $locale: I18NLocaleCode!) {
  entry: parameterType(id: $id, locale: $locale) {
    data {
      id
      attributes {
        name
        slug
        localizations { data { id attributes { locale } } }
      }
    }
  }
}
";

pub const CREATE_PARAMETER_TYPE: &str = r"
mutation CreateParameterType($data: ParameterTypeInput!, $locale: I18NLocaleCode!) {
  entry: createParameterType(data: $data, locale: $locale) {
    data {
      id
      attributes {
        name
        slug
        localizations { data { id attributes { locale } } }
      }
    }
  }
}
";

pub const CREATE_PARAMETER_TYPE_LOCALIZATION: &str = r"
mutation CreateParameterTypeLocalization($id: ID!, $locale: I18NLocaleCode!, $data: ParameterTypeInput!) {
  entry: createParameterTypeLocalization(id: $id, locale: $locale, data: $data) {
    data { id attributes { locale } }
  }
}
";

pub const LIST_PARAMETER_TYPES: &str = r"
query ListParameterTypes($locale: I18NLocaleCode!, $pagination: PaginationArg) {
  entries: parameterTypes(locale: $locale, pagination: $pagination) {
    data {
      id
      attributes {
        name
        slug
        localizations { data { id attributes { locale } } }
      }
    }
    meta { pagination { total page pageSize pageCount } }
  }
}
";

/// Parameter value by (value text, owning type id).
pub const PARAMETER_VALUE_BY_VALUE: &str = r"
query ParameterValueByValue($value: String!, $parameterTypeId: ID!, $locale: I18NLocaleCode!) {
  entries: parameterValues(
    filters: { value: { eq: $value }, parameter_type: { id: { eq: $parameterTypeId } } }
    locale: $locale
  ) {
    data {
      id
      attributes {
        value
        code
        parameter_type { data { id attributes { name } } }
        localizations { data { id attributes { locale } } }
      }
    }
  }
}
";

pub const LIST_PARAMETER_VALUES: &str = r"
query ListParameterValues($locale: I18NLocaleCode!, $pagination: PaginationArg) {
  entries: parameterValues(locale: $locale, pagination: $pagination) {
    data {
      id
      attributes {
        value
        code
        parameter_type { data { id attributes { name } } }
        localizations { data { id attributes { locale } } }
      }
    }
    meta { pagination { total page pageSize pageCount } }
  }
}
";

pub const CREATE_PARAMETER_VALUE: &str = r"
mutation CreateParameterValue($data: ParameterValueInput!, $locale: I18NLocaleCode!) {
  entry: createParameterValue(data: $data, locale: $locale) {
    data {
      id
      attributes {
        value
        code
        localizations { data { id attributes { locale } } }
      }
    }
  }
}
";

pub const CREATE_PARAMETER_VALUE_LOCALIZATION: &str = r"
mutation CreateParameterValueLocalization($id: ID!, $locale: I18NLocaleCode!, $data: ParameterValueInput!) {
  entry: createParameterValueLocalization(id: $id, locale: $locale, data: $data) {
    data { id attributes { locale } }
  }
}
";

/// Product by its part number, with relations and peers.
pub const PRODUCT_BY_PART_NUMBER: &str = r"
query ProductByPartNumber($partNumber: String!, $locale: I18NLocaleCode!) {
  entries: products(filters: { part_number: { eq: $partNumber } }, locale: $locale) {
    data {
      id
      attributes {
        part_number
        title
        description
        retail
        currency
        slug
        image_link
        media_archive
        additional_images { link }
        subcategory { data { id } }
        product_types { data { id } }
        product_parameters { data { id attributes { parameter_value { data { id } } } } }
        localizations { data { id attributes { locale } } }
      }
    }
  }
}
";

pub const CREATE_PRODUCT_LOCALIZATION: &str = r"
mutation CreateProductLocalization($id: ID!, $locale: I18NLocaleCode!, $data: ProductInput!) {
  entry: createProductLocalization(id: $id, locale: $locale, data: $data) {
    data { id attributes { locale } }
  }
}
";

pub const LIST_PRODUCTS: &str = r"
query ListProducts($locale: I18NLocaleCode!, $pagination: PaginationArg) {
  entries: products(locale: $locale, pagination: $pagination) {
    data {
      id
      attributes {
        part_number
        title
        description
        retail
        currency
        slug
        image_link
        media_archive
        additional_images { link }
        subcategory { data { id } }
        product_types { data { id } }
        product_parameters { data { id attributes { parameter_value { data { id } } } } }
        localizations { data { id attributes { locale } } }
      }
    }
    meta { pagination { total page pageSize pageCount } }
  }
}
";

pub const PRODUCT_PARAMETERS: &str = r"
query ProductParameters($productId: ID!, $locale: I18NLocaleCode!) {
  entries: productParameters(
    filters: { product: { id: { eq: $productId } } }
    locale: $locale
  ) {
    data { id attributes { parameter_value { data { id } } } }
  }
}
";

pub const CREATE_PRODUCT_PARAMETER: &str = r"
mutation CreateProductParameter($data: ProductParameterInput!, $locale: I18NLocaleCode!) {
  entry: createProductParameter(data: $data, locale: $locale) {
    data { id }
  }
}
";

/// Localization peers of one entity, root field aliased per kind.
pub const PRODUCT_LOCALIZATIONS: &str = r"
query ProductLocalizations($id: ID!) {
  entry: product(id: $id) {
    data { id attributes { localizations { data { id attributes { locale } } } } }
  }
}
";

pub const PARAMETER_VALUE_LOCALIZATIONS: &str = r"
query ParameterValueLocalizations($id: ID!) {
  entry: parameterValue(id: $id) {
    data { id attributes { localizations { data { id attributes { locale } } } } }
  }
}
";

pub const SUBCATEGORY_LOCALIZATIONS: &str = r"
query SubcategoryLocalizations($id: ID!) {
  entry: subcategory(id: $id) {
    data { id attributes { localizations { data { id attributes { locale } } } } }
  }
}
";

pub const PRODUCT_TYPE_LOCALIZATIONS: &str = r"
query ProductTypeLocalizations($id: ID!) {
  entry: productType(id: $id) {
    data { id attributes { localizations { data { id attributes { locale } } } } }
  }
}
";
